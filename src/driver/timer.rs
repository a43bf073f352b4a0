//! Smart timer driver
//!
//! Programs a smart timer through any [`RegisterBus`]: PERIOD/DUTY
//! configuration, enable control, and WRAP handling. The interrupt handler
//! acknowledges WRAP (W1C) and keeps a running wrap count that blocking
//! waits compare against.

use embedded_hal::delay::DelayNs;

use super::config::TimerConfig;
use super::status::TimerStatus;
use crate::constants::POLL_INTERVAL_US;
use crate::error::{IoError, IoResult, Result};
use crate::hal::bus::RegisterBus;
use crate::register::timer::{
    CTRL_EN, CTRL_OFFSET, DUTY_OFFSET, PERIOD_OFFSET, STATUS_OFFSET, STATUS_WRAP,
};

/// Smart timer driver
#[derive(Debug)]
pub struct TimerDriver<B: RegisterBus> {
    bus: B,
    wraps: u32,
}

impl<B: RegisterBus> TimerDriver<B> {
    /// Create a driver over `bus`
    pub const fn new(bus: B) -> Self {
        Self { bus, wraps: 0 }
    }

    /// Release the bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Program PERIOD and DUTY, then enable if requested
    ///
    /// While the timer is running the new values are staged and take effect
    /// on the next wrap.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::DutyExceedsPeriod`] if the
    /// configuration does not validate; nothing is written in that case.
    pub fn configure(&mut self, config: &TimerConfig) -> Result<()> {
        config.validate()?;

        self.bus.write(PERIOD_OFFSET, config.period);
        self.bus.write(DUTY_OFFSET, config.duty);
        if config.enable {
            self.enable();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "timer: configured period={=u32} duty={=u32}",
            config.period,
            config.duty
        );
        Ok(())
    }

    /// Set PERIOD
    pub fn set_period(&mut self, period: u32) {
        self.bus.write(PERIOD_OFFSET, period);
    }

    /// Set DUTY
    pub fn set_duty(&mut self, duty: u32) {
        self.bus.write(DUTY_OFFSET, duty);
    }

    /// Last PERIOD written
    pub fn period(&mut self) -> u32 {
        self.bus.read(PERIOD_OFFSET)
    }

    /// Last DUTY written
    pub fn duty(&mut self) -> u32 {
        self.bus.read(DUTY_OFFSET)
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Set EN
    pub fn enable(&mut self) {
        self.bus.write(CTRL_OFFSET, CTRL_EN);
    }

    /// Clear EN (commits any staged PERIOD/DUTY on the next tick)
    pub fn disable(&mut self) {
        self.bus.write(CTRL_OFFSET, 0);
    }

    /// Whether EN is set
    pub fn is_enabled(&mut self) -> bool {
        self.bus.read(CTRL_OFFSET) & CTRL_EN != 0
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Read STATUS
    pub fn status(&mut self) -> TimerStatus {
        TimerStatus::from_raw(self.bus.read(STATUS_OFFSET))
    }

    /// Acknowledge WRAP
    pub fn ack_wrap(&mut self) {
        self.bus.write(STATUS_OFFSET, STATUS_WRAP);
    }

    /// Whether a PERIOD/DUTY write is waiting for commit
    pub fn update_pending(&mut self) -> bool {
        self.status().update_pending
    }

    /// Interrupt handler body
    ///
    /// Returns `false` if WRAP was not set (the interrupt was not ours).
    pub fn handle_interrupt(&mut self) -> bool {
        if !self.status().wrap {
            return false;
        }
        self.ack_wrap();
        self.wraps = self.wraps.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::trace!("timer: wrap irq, count={=u32}", self.wraps);
        true
    }

    /// Wraps handled since the driver was created
    pub const fn wrap_count(&self) -> u32 {
        self.wraps
    }

    /// Busy-wait for the next wrap
    ///
    /// Polls STATUS up to `max_polls` times, backing off between polls.
    /// The wrap is acknowledged and counted.
    ///
    /// # Errors
    ///
    /// - [`IoError::NotEnabled`] if EN is clear (the timer would never wrap)
    /// - [`IoError::Timeout`] if no wrap was seen within `max_polls` polls
    pub fn wait_wrap<D: DelayNs>(&mut self, delay: &mut D, max_polls: u32) -> IoResult<()> {
        if !self.is_enabled() {
            return Err(IoError::NotEnabled);
        }
        for _ in 0..max_polls {
            if self.handle_interrupt() {
                return Ok(());
            }
            delay.delay_us(POLL_INTERVAL_US);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("timer: no wrap after {=u32} polls", max_polls);
        Err(IoError::Timeout)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
