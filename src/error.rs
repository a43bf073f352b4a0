//! Error types for the peripheral models and drivers
//!
//! Errors are organized by domain for better diagnostics:
//! - [`BusFault`]: register-bus accesses the responder could not decode
//! - [`ConfigError`]: invalid driver or adapter configuration
//! - [`IoError`]: runtime failures while waiting on the peripheral
//!
//! Nothing here crosses the register-bus boundary: the peripheral answers
//! every request (unmapped reads return 0) and only records a [`BusFault`].
//! The unified [`Error`] enum wraps all domain errors and is returned by
//! the driver methods.

// =============================================================================
// Bus Faults
// =============================================================================

/// Register-bus decode faults
///
/// Recorded by a peripheral when a request cannot be decoded. The request
/// still completes: reads return 0 and writes are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Address does not belong to any register
    UnmappedAddress(u32),
    /// Address is not aligned to a 32-bit word
    MisalignedAddress(u32),
}

impl core::fmt::Display for BusFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {:#05x}", self.as_str(), self.address())
    }
}

impl BusFault {
    /// Returns a human-readable description of the fault
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusFault::UnmappedAddress(_) => "unmapped address",
            BusFault::MisalignedAddress(_) => "misaligned address",
        }
    }

    /// Address of the faulting request
    #[must_use]
    pub const fn address(&self) -> u32 {
        match self {
            BusFault::UnmappedAddress(addr) | BusFault::MisalignedAddress(addr) => *addr,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration errors
///
/// These errors occur when a driver or bus adapter is given parameters the
/// peripheral cannot honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// DUTY is larger than PERIOD
    DutyExceedsPeriod,
    /// More samples than the DATA_IN array holds
    TooManySamples,
    /// Output buffer shorter than the programmed LEN
    OutputTooSmall,
    /// Bus latency outside the supported range
    InvalidLatency,
    /// Poll budget of zero
    InvalidPollBudget,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::DutyExceedsPeriod => "duty exceeds period",
            ConfigError::TooManySamples => "too many samples",
            ConfigError::OutputTooSmall => "output buffer too small",
            ConfigError::InvalidLatency => "invalid bus latency",
            ConfigError::InvalidPollBudget => "poll budget must be non-zero",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime errors while driving the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Operation timed out
    Timeout,
    /// Engine not enabled (EN=0)
    NotEnabled,
    /// A computation is already in flight
    Busy,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::NotEnabled => "engine not enabled",
            IoError::Busy => "computation in progress",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::TooManySamples)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus decode fault
    Bus(BusFault),
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus: {e}"),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<BusFault> for Error {
    fn from(e: BusFault) -> Self {
        Error::Bus(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn bus_fault_reports_address() {
        assert_eq!(BusFault::UnmappedAddress(0x300).address(), 0x300);
        assert_eq!(BusFault::MisalignedAddress(0x102).address(), 0x102);
    }

    #[test]
    fn bus_fault_display() {
        let display = format!("{}", BusFault::UnmappedAddress(0x300));
        assert_eq!(display, "unmapped address at 0x300");
    }

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::DutyExceedsPeriod,
            ConfigError::TooManySamples,
            ConfigError::OutputTooSmall,
            ConfigError::InvalidLatency,
            ConfigError::InvalidPollBudget,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "ConfigError::{variant:?} has empty string");
        }
    }

    #[test]
    fn io_error_display() {
        let display = format!("{}", IoError::Timeout);
        assert_eq!(display, "operation timed out");
    }

    #[test]
    fn error_from_domain_errors() {
        let err: Error = IoError::Busy.into();
        assert_eq!(err, Error::Io(IoError::Busy));

        let err: Error = ConfigError::TooManySamples.into();
        assert_eq!(err, Error::Config(ConfigError::TooManySamples));

        let err: Error = BusFault::UnmappedAddress(4).into();
        assert_eq!(err, Error::Bus(BusFault::UnmappedAddress(4)));
    }

    #[test]
    fn error_display_prefixes_domain() {
        let display = format!("{}", Error::Config(ConfigError::DutyExceedsPeriod));
        assert!(display.contains("config"));
        assert!(display.contains("duty"));

        let display = format!("{}", Error::Bus(BusFault::MisalignedAddress(0x6)));
        assert!(display.starts_with("bus: misaligned"));
    }

    #[test]
    fn result_aliases_work() {
        fn config() -> ConfigResult<u32> {
            Err(ConfigError::InvalidLatency)
        }
        fn io() -> IoResult<u32> {
            Ok(7)
        }

        assert!(config().is_err());
        assert_eq!(io().unwrap(), 7);
    }
}
