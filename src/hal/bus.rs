//! Register-bus HAL
//!
//! The bus is a single-master, single-outstanding-transaction protocol: a
//! request carries a byte address and either a read or a 32-bit write, and
//! the responder always completes it. Decode problems are never reported to
//! the master; the responder records them instead (see
//! [`crate::error::BusFault`]).
//!
//! [`RegisterBus`] is implemented by the peripheral models themselves (zero
//! latency, no clocking) and by [`ClockedBus`], which models a synchronous
//! slave that spends one or two clock ticks per transaction.

use crate::constants::{MAX_BUS_LATENCY, MIN_BUS_LATENCY};
use crate::device::Peripheral;
use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Transactions
// =============================================================================

/// Bus operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Op {
    /// Read a 32-bit word
    Read,
    /// Write a 32-bit word
    Write(u32),
}

/// A single bus request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request {
    /// Byte address within the peripheral
    pub address: u32,
    /// Operation
    pub op: Op,
}

impl Request {
    /// Read request
    pub const fn read(address: u32) -> Self {
        Self {
            address,
            op: Op::Read,
        }
    }

    /// Write request
    pub const fn write(address: u32, value: u32) -> Self {
        Self {
            address,
            op: Op::Write(value),
        }
    }
}

/// Bus response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Read data
    Read(u32),
    /// Write completed
    WriteAck,
}

impl Response {
    /// Read data, if this is a read response
    pub const fn data(self) -> Option<u32> {
        match self {
            Response::Read(value) => Some(value),
            Response::WriteAck => None,
        }
    }
}

// =============================================================================
// Register Bus Trait
// =============================================================================

/// Trait for register-bus masters and responders
///
/// Drivers are generic over this trait so the same code programs a model
/// directly, through a [`ClockedBus`], or through a recording test double.
pub trait RegisterBus {
    /// Read the word at `address`
    fn read(&mut self, address: u32) -> u32;

    /// Write `value` to `address`
    fn write(&mut self, address: u32, value: u32);

    /// Complete one request
    fn transact(&mut self, request: Request) -> Response {
        match request.op {
            Op::Read => Response::Read(self.read(request.address)),
            Op::Write(value) => {
                self.write(request.address, value);
                Response::WriteAck
            }
        }
    }

    /// Read-modify-write
    ///
    /// Only meaningful for registers without W1C fields; writing back a read
    /// W1C bit clears it.
    fn modify<F>(&mut self, address: u32, f: F)
    where
        Self: Sized,
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(address);
        self.write(address, f(value));
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&mut self, address: u32) -> u32 {
        (**self).read(address)
    }

    fn write(&mut self, address: u32, value: u32) {
        (**self).write(address, value);
    }

    fn transact(&mut self, request: Request) -> Response {
        (**self).transact(request)
    }
}

// =============================================================================
// Clocked Bus Adapter
// =============================================================================

/// Synchronous slave adapter
///
/// Each transaction is applied to the peripheral and then the peripheral is
/// clocked `latency` times, so a master polling STATUS through this adapter
/// sees the engine advance between its accesses. A read samples the
/// register before those ticks.
#[derive(Debug)]
pub struct ClockedBus<P: Peripheral> {
    peripheral: P,
    latency: u8,
    cycles: u64,
}

impl<P: Peripheral> ClockedBus<P> {
    /// Wrap `peripheral` with a per-transaction latency in ticks
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLatency`] unless `latency` is 1 or 2.
    pub fn new(peripheral: P, latency: u8) -> ConfigResult<Self> {
        if !(MIN_BUS_LATENCY..=MAX_BUS_LATENCY).contains(&latency) {
            return Err(ConfigError::InvalidLatency);
        }
        Ok(Self {
            peripheral,
            latency,
            cycles: 0,
        })
    }

    /// Ticks spent per transaction
    pub const fn latency(&self) -> u8 {
        self.latency
    }

    /// Total ticks elapsed through this adapter
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance the peripheral without a transaction
    pub fn idle(&mut self, ticks: u32) {
        self.peripheral.tick_n(ticks);
        self.cycles += u64::from(ticks);
    }

    /// Borrow the peripheral
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Mutably borrow the peripheral
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    /// Release the peripheral
    pub fn into_inner(self) -> P {
        self.peripheral
    }

    fn clock(&mut self) {
        self.idle(u32::from(self.latency));
    }
}

impl<P: Peripheral> RegisterBus for ClockedBus<P> {
    fn read(&mut self, address: u32) -> u32 {
        let value = self.peripheral.read(address);
        self.clock();
        value
    }

    fn write(&mut self, address: u32, value: u32) {
        self.peripheral.write(address, value);
        self.clock();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
