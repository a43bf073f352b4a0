//! Configuration types for the timer and FIR drivers

use crate::constants::{DEFAULT_MAX_POLLS, FIR_TAPS, TIMER_DUTY_RESET, TIMER_PERIOD_RESET};
use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Timer Configuration
// =============================================================================

/// Smart timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Counter wraps after reaching this value (wrap every `period + 1` ticks)
    pub period: u32,
    /// Output compare threshold
    pub duty: u32,
    /// Set EN after programming
    pub enable: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerConfig {
    /// Create a configuration matching the register reset values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            period: TIMER_PERIOD_RESET,
            duty: TIMER_DUTY_RESET,
            enable: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the period
    #[must_use]
    pub const fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Set the duty threshold
    #[must_use]
    pub const fn with_duty(mut self, duty: u32) -> Self {
        self.duty = duty;
        self
    }

    /// Enable the timer as the last configuration step
    #[must_use]
    pub const fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Check the configuration
    ///
    /// The peripheral accepts any DUTY; the driver requires `duty <= period`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DutyExceedsPeriod`] if `duty > period`.
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.duty > self.period {
            return Err(ConfigError::DutyExceedsPeriod);
        }
        Ok(())
    }
}

// =============================================================================
// FIR Configuration
// =============================================================================

/// FIR filter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirConfig {
    /// Q15 tap coefficients, `coeffs[0]` applies to the newest sample
    pub coeffs: [i16; FIR_TAPS],
    /// STATUS polls before a blocking wait gives up
    pub max_polls: u32,
}

impl Default for FirConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FirConfig {
    /// Create a configuration with zero coefficients
    #[must_use]
    pub const fn new() -> Self {
        Self {
            coeffs: [0; FIR_TAPS],
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Set all tap coefficients
    #[must_use]
    pub const fn with_coefficients(mut self, coeffs: [i16; FIR_TAPS]) -> Self {
        self.coeffs = coeffs;
        self
    }

    /// Set a single tap coefficient
    ///
    /// Out-of-range taps are ignored.
    #[must_use]
    pub const fn with_tap(mut self, tap: usize, coeff: i16) -> Self {
        if tap < FIR_TAPS {
            self.coeffs[tap] = coeff;
        }
        self
    }

    /// Set the poll budget for blocking waits
    #[must_use]
    pub const fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Check the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPollBudget`] if `max_polls` is zero.
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.max_polls == 0 {
            return Err(ConfigError::InvalidPollBudget);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
