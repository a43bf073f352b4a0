//! Centralized Constants
//!
//! This module provides a single source of truth for the reset values,
//! capacities and fixed-point parameters used throughout the peripheral
//! models and drivers.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Timer defaults**: reset values of the timer configuration registers
//! - **FIR geometry**: tap count, sample buffer capacity, Q15 format
//! - **Bus timing**: transaction latency bounds of the synchronous slave
//! - **Driver polling**: default poll budgets for blocking waits
//!
//! # Note
//!
//! Register offsets and bit definitions remain in their respective modules
//! (`register/timer.rs`, `register/fir.rs`) as they are specific to those
//! register blocks.

// =============================================================================
// Timer Defaults
// =============================================================================

/// PERIOD reset value
pub const TIMER_PERIOD_RESET: u32 = 0xFF;

/// DUTY reset value
pub const TIMER_DUTY_RESET: u32 = 0xAA;

// =============================================================================
// FIR Geometry
// =============================================================================

/// Number of fixed FIR taps
pub const FIR_TAPS: usize = 4;

/// Capacity of the DATA_IN / DATA_OUT sample arrays
pub const FIR_MAX_SAMPLES: usize = 32;

/// Fractional bits of the Q15 coefficient and sample format
pub const Q15_FRAC_BITS: u32 = 15;

/// Q15 encoding of the largest value below 1.0 (~0.99997)
pub const Q15_ONE: i16 = 0x7FFF;

/// Q15 encoding of 0.5
pub const Q15_HALF: i16 = 0x4000;

/// Q15 encoding of 0.25
pub const Q15_QUARTER: i16 = 0x2000;

// =============================================================================
// Bus Timing
// =============================================================================

/// Minimum ticks a synchronous slave transaction takes
pub const MIN_BUS_LATENCY: u8 = 1;

/// Maximum ticks a synchronous slave transaction takes
pub const MAX_BUS_LATENCY: u8 = 2;

/// Register word size in bytes (stride of array registers)
pub const WORD_BYTES: u32 = 4;

// =============================================================================
// Driver Polling
// =============================================================================

/// Default number of STATUS polls before a blocking wait gives up
pub const DEFAULT_MAX_POLLS: u32 = 1_000;

/// Back-off between STATUS polls in microseconds
pub const POLL_INTERVAL_US: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q15_constants_match_fraction() {
        assert_eq!(Q15_HALF as i32, 1 << (Q15_FRAC_BITS - 1));
        assert_eq!(Q15_QUARTER as i32, 1 << (Q15_FRAC_BITS - 2));
        assert_eq!(Q15_ONE as i32, (1 << Q15_FRAC_BITS) - 1);
    }

    #[test]
    fn bus_latency_bounds_are_ordered() {
        assert!(MIN_BUS_LATENCY >= 1);
        assert!(MIN_BUS_LATENCY <= MAX_BUS_LATENCY);
    }

    #[test]
    fn duty_reset_fits_period_reset() {
        assert!(TIMER_DUTY_RESET <= TIMER_PERIOD_RESET);
    }
}
