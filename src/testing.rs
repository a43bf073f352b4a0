//! Testing utilities and mock implementations
//!
//! This module provides test doubles for exercising the drivers against the
//! peripheral models on the host.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::vec::Vec;

use crate::hal::bus::{Op, RegisterBus, Request};

// =============================================================================
// Recording Bus
// =============================================================================

/// Bus wrapper that logs every transaction before forwarding it
///
/// # Example
///
/// ```ignore
/// let mut bus = RecordingBus::new(SmartTimer::new());
/// TimerDriver::new(&mut bus).enable();
/// assert_reg_written!(bus, CTRL_OFFSET, CTRL_EN);
/// ```
#[derive(Debug)]
pub struct RecordingBus<B: RegisterBus> {
    inner: B,
    log: Vec<Request>,
}

impl<B: RegisterBus> RecordingBus<B> {
    /// Wrap `inner`
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    /// Writes as `(address, value)` in issue order
    pub fn get_writes(&self) -> Vec<(u32, u32)> {
        self.log
            .iter()
            .filter_map(|r| match r.op {
                Op::Write(value) => Some((r.address, value)),
                Op::Read => None,
            })
            .collect()
    }

    /// Number of reads of `address`
    pub fn reads_of(&self, address: u32) -> usize {
        self.log
            .iter()
            .filter(|r| r.address == address && r.op == Op::Read)
            .count()
    }

    /// The wrapped bus
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: RegisterBus> RegisterBus for RecordingBus<B> {
    fn read(&mut self, address: u32) -> u32 {
        self.log.push(Request::read(address));
        self.inner.read(address)
    }

    fn write(&mut self, address: u32, value: u32) {
        self.log.push(Request::write(address, value));
        self.inner.write(address, value);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
    /// Number of delay calls
    calls: RefCell<u32>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }

    /// Number of delay calls
    pub fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
        *self.calls.borrow_mut() += 1;
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that a register was written with a specific value
#[macro_export]
macro_rules! assert_reg_written {
    ($bus:expr, $addr:expr, $value:expr) => {
        let writes = $bus.get_writes();
        assert!(
            writes.iter().any(|w| w.0 == $addr && w.1 == $value),
            "Expected write to {:#05x} with value {:#010x}, but got: {:?}",
            $addr,
            $value,
            writes
        );
    };
}

/// Assert that a register was never written
#[macro_export]
macro_rules! assert_reg_not_written {
    ($bus:expr, $addr:expr) => {
        let writes = $bus.get_writes();
        assert!(
            !writes.iter().any(|w| w.0 == $addr),
            "Expected no write to {:#05x}, but got: {:?}",
            $addr,
            writes
        );
    };
}
