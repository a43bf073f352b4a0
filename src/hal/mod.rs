//! Hardware Abstraction Layer
//!
//! Bus access to the register-mapped peripherals.
//!
//! # Modules
//!
//! - [`bus`]: Register bus trait and the clocked bus adapter
//!
//! # Delay Integration
//!
//! Drivers that poll use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod bus;

// Re-export commonly used types
pub use bus::{ClockedBus, Op, RegisterBus, Request, Response};
