//! Synchronization and Concurrency Support
//!
//! Concurrency-safe wrappers for the peripheral models:
//!
//! - **Shared Wrappers** (`shared`): ISR-safe peripheral wrappers
//!   - [`SharedPeripheral`] - Critical-section protected peripheral
//!
//! - **Async Support** (`asynch`): Await a peripheral's interrupt line
//!   through a per-line `IrqWaker` slot
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables the `shared` module
//! - `async`: Enables `asynch` module (also requires `critical-section`)
//!
//! # Example
//!
//! ```ignore
//! use ph_mmio_periph::sync::{SharedTimer, SharedPeripheral};
//!
//! static TIMER: SharedTimer = SharedPeripheral::new(SmartTimer::new());
//!
//! fn main() {
//!     TIMER.with(|timer| {
//!         TimerDriver::new(timer)
//!             .configure(&TimerConfig::new().with_period(99).with_enable(true))
//!             .unwrap();
//!     });
//! }
//!
//! #[interrupt]
//! fn TIMER_IRQ() {
//!     TIMER.with(|timer| {
//!         TimerDriver::new(timer).handle_interrupt();
//!     });
//! }
//! ```

mod shared;

pub use shared::{SharedFir, SharedPeripheral, SharedTimer};

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(feature = "async")]
pub use asynch::{
    FIR_WAKER, IrqFuture, IrqWaker, TIMER_WAKER, on_interrupt, reset_async_state, wait_irq,
};
