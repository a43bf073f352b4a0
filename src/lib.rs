//! Register-Mapped Timer and FIR Peripheral Models
//!
//! A `no_std`, `no_alloc` cycle-level model of two memory-mapped peripherals
//! and the host-side drivers that program them over a register bus.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! 1. **Register Layer** ([`register`]): Declarative register maps, access
//!    policies (RW, RO, W1C, W1P) and the backing register file
//! 2. **Engine Layer** ([`engine`]): Clocked behaviour shared by the
//!    peripherals: shadow/active commit, timer wrap, FIR compute, interrupt
//! 3. **Device Layer** ([`device`]): [`SmartTimer`] and [`FirFilter`],
//!    composed from the register and engine layers
//! 4. **HAL Layer** ([`hal`]): The [`RegisterBus`] trait and a
//!    [`ClockedBus`] adapter that ticks a peripheral per transaction
//! 5. **Driver Layer** ([`driver`]): [`TimerDriver`] and [`FirDriver`]
//!
//! ## Cycle Model
//!
//! One call to [`Peripheral::tick`] is one clock edge. Bus reads and writes
//! happen between ticks; write side effects (pulse latching, W1C clears,
//! shadow staging) are visible to the next tick. The interrupt output is
//! combinational, so acknowledging a status bit drops the line immediately.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and logging
//! - `critical-section`: Enable ISR-safe `SharedPeripheral` wrapper
//! - `async`: Enable async/await support with wakers
//!
//! # Example
//!
//! ```ignore
//! use ph_mmio_periph::{ClockedBus, FirConfig, FirDriver, FirFilter};
//!
//! let bus = ClockedBus::new(FirFilter::new(), 1)?;
//! let mut fir = FirDriver::new(bus);
//! fir.configure(&FirConfig::new().with_coefficients([0x4000, 0x4000, 0, 0]))?;
//!
//! let mut out = [0i16; 4];
//! let n = fir.process(&[100, 200, 300, 400], &mut out, &mut delay)?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod device;
pub mod driver;
pub mod engine;
pub mod error;
pub mod hal;
pub mod register;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use device::{FaultLog, FirFilter, Peripheral, SmartTimer};
pub use driver::{FirConfig, FirDriver, FirStatus, TimerConfig, TimerDriver, TimerStatus};
pub use engine::{CounterOnDisable, DutyCompare, FirState, TimerOptions};
pub use error::{BusFault, ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use hal::{ClockedBus, RegisterBus};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{SharedFir, SharedPeripheral, SharedTimer};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub use sync::asynch::{IrqFuture, IrqWaker, on_interrupt, wait_irq};
