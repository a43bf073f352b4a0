//! Composed peripheral models
//!
//! A peripheral owns a [`RegisterFile`](crate::register::file::RegisterFile),
//! a shadow bank, its engine and an interrupt unit, and wires them together
//! on every tick:
//!
//! 1. consume pulses latched by bus writes since the previous tick
//! 2. advance the engine with the active configuration
//! 3. fold engine events into STATUS (W1C sets, UPD_PENDING mirror, commits)
//! 4. sample STATUS for the interrupt line
//!
//! Bus accesses between ticks go through [`RegisterBus`]; they never fail.

pub mod fir;
pub mod timer;

pub use fir::FirFilter;
pub use timer::SmartTimer;

use crate::error::BusFault;
use crate::hal::bus::RegisterBus;

/// A clocked peripheral with a register-bus face and an interrupt line
pub trait Peripheral: RegisterBus {
    /// Advance one clock tick
    fn tick(&mut self);

    /// Advance `n` clock ticks
    fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Restore reset defaults and return engines to idle
    fn reset(&mut self);

    /// Level of the interrupt output
    fn irq(&self) -> bool;
}

impl<P: Peripheral + ?Sized> Peripheral for &mut P {
    fn tick(&mut self) {
        (**self).tick();
    }

    fn tick_n(&mut self, n: u32) {
        (**self).tick_n(n);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn irq(&self) -> bool {
        (**self).irq()
    }
}

/// Record of bus requests the responder could not decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultLog {
    last: Option<BusFault>,
    count: u32,
}

impl FaultLog {
    /// Empty log
    pub const fn new() -> Self {
        Self {
            last: None,
            count: 0,
        }
    }

    /// Record a fault
    pub fn record(&mut self, peripheral: &'static str, fault: BusFault) {
        #[cfg(feature = "defmt")]
        defmt::warn!("{}: {} at {=u32:#x}", peripheral, fault.as_str(), fault.address());
        #[cfg(not(feature = "defmt"))]
        let _ = peripheral;

        self.last = Some(fault);
        self.count = self.count.saturating_add(1);
    }

    /// Most recent fault
    pub const fn last(&self) -> Option<BusFault> {
        self.last
    }

    /// Number of faults since reset
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Forget recorded faults
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
