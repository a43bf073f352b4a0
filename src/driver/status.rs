//! STATUS register parsing
//!
//! [`TimerStatus`] and [`FirStatus`] turn the raw STATUS word into named
//! flags and back. Only the event bits are W1C; `to_raw` of a parsed status
//! may therefore be written back to acknowledge exactly the events that were
//! observed, since writes to the RO `UPD_PENDING` bit are ignored.

use crate::register::{fir, timer};

// =============================================================================
// Timer Status
// =============================================================================

/// Smart timer STATUS flags
///
/// # Example
///
/// ```ignore
/// let status = timer.status();
/// if status.wrap {
///     timer.ack_wrap();
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerStatus {
    /// Counter wrapped since the last acknowledge (W1C)
    pub wrap: bool,
    /// PERIOD/DUTY write waiting for commit (RO)
    pub update_pending: bool,
}

impl TimerStatus {
    /// Create from raw STATUS register value
    #[inline]
    pub const fn from_raw(status: u32) -> Self {
        Self {
            wrap: status & timer::STATUS_WRAP != 0,
            update_pending: status & timer::STATUS_UPD_PENDING != 0,
        }
    }

    /// Convert to raw value
    #[inline]
    pub const fn to_raw(&self) -> u32 {
        let mut val = 0;
        if self.wrap {
            val |= timer::STATUS_WRAP;
        }
        if self.update_pending {
            val |= timer::STATUS_UPD_PENDING;
        }
        val
    }

    /// Check if an interrupt-raising event is set
    #[inline]
    pub const fn any(&self) -> bool {
        self.wrap
    }
}

// =============================================================================
// FIR Status
// =============================================================================

/// FIR filter STATUS flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirStatus {
    /// Run completed since the last acknowledge (W1C)
    pub done: bool,
    /// LEN/COEFF write waiting for commit (RO)
    pub update_pending: bool,
}

impl FirStatus {
    /// Create from raw STATUS register value
    #[inline]
    pub const fn from_raw(status: u32) -> Self {
        Self {
            done: status & fir::STATUS_DONE != 0,
            update_pending: status & fir::STATUS_UPD_PENDING != 0,
        }
    }

    /// Convert to raw value
    #[inline]
    pub const fn to_raw(&self) -> u32 {
        let mut val = 0;
        if self.done {
            val |= fir::STATUS_DONE;
        }
        if self.update_pending {
            val |= fir::STATUS_UPD_PENDING;
        }
        val
    }

    /// Check if an interrupt-raising event is set
    #[inline]
    pub const fn any(&self) -> bool {
        self.done
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
