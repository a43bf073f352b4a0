//! Host-side drivers for the timer and FIR peripherals.
//!
//! Drivers are generic over [`RegisterBus`](crate::hal::bus::RegisterBus),
//! so the same code programs a peripheral model directly, through a
//! [`ClockedBus`](crate::hal::bus::ClockedBus), or through a test double.
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`status`] - STATUS register parsing
//! - [`timer`] - Smart timer driver
//! - [`fir`] - FIR filter driver
//!
//! # Example
//!
//! ```ignore
//! use ph_mmio_periph::driver::{TimerConfig, TimerDriver};
//!
//! let mut timer = TimerDriver::new(bus);
//! timer.configure(&TimerConfig::new().with_period(99).with_duty(25).with_enable(true))?;
//! timer.wait_wrap(&mut delay, 1_000)?;
//! ```

// Submodules
pub mod config;
pub mod fir;
pub mod status;
pub mod timer;

// Re-exports for convenience
pub use config::{FirConfig, TimerConfig};
pub use fir::FirDriver;
pub use status::{FirStatus, TimerStatus};
pub use timer::TimerDriver;
