//! Cycle-level engines
//!
//! Each engine is a plain state machine advanced by one `tick` per clock. It
//! never touches the register file: the owning peripheral feeds it the
//! active configuration and turns the returned events into STATUS updates.
//!
//! - [`shadow`]: shadow/active double buffering and the commit rule
//! - [`timer`]: free-running wrap counter with output compare
//! - [`fir`]: START-triggered 4-tap Q15 FIR sequencer
//! - [`interrupt`]: level interrupt derived from STATUS bits

pub mod fir;
pub mod interrupt;
pub mod shadow;
pub mod timer;

pub use fir::{
    FirComputeEngine, FirControl, FirEvents, FirSettings, FirState, q15_mac, saturate_i16,
};
pub use interrupt::{InterruptUnit, IrqEdge};
pub use shadow::{Routing, ShadowCommitEngine, Staged};
pub use timer::{CounterOnDisable, DutyCompare, TimerEvents, TimerOptions, TimerWrapEngine};
