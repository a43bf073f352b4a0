//! FIR filter driver
//!
//! Loads samples and coefficients, starts a run and collects the filtered
//! output. Completion is observed either by polling STATUS.DONE
//! ([`FirDriver::wait_done`]) or from the interrupt handler
//! ([`FirDriver::handle_interrupt`]); both acknowledge DONE.
//!
//! # Example
//!
//! ```ignore
//! let mut fir = FirDriver::new(bus);
//! fir.configure(&FirConfig::new().with_coefficients([Q15_QUARTER; 4]))?;
//! let mut out = [0i16; 5];
//! let n = fir.process(&[4, 8, 12, 16, 20], &mut out, &mut delay)?;
//! ```

use embedded_hal::delay::DelayNs;

use super::config::FirConfig;
use super::status::FirStatus;
use crate::constants::{FIR_MAX_SAMPLES, FIR_TAPS, POLL_INTERVAL_US};
use crate::error::{ConfigError, IoError, IoResult, Result};
use crate::hal::bus::RegisterBus;
use crate::register::fir::{
    COEFF_MASK, CTRL_EN, CTRL_OFFSET, CTRL_RESET, CTRL_START, LEN_OFFSET, SAMPLE_MASK,
    STATUS_DONE, STATUS_OFFSET, coeff_offset, data_in_offset, data_out_offset,
};

/// FIR filter driver
#[derive(Debug)]
pub struct FirDriver<B: RegisterBus> {
    bus: B,
    config: FirConfig,
    in_flight: bool,
    completions: u32,
}

impl<B: RegisterBus> FirDriver<B> {
    /// Create a driver over `bus` with the default configuration
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            config: FirConfig::new(),
            in_flight: false,
            completions: 0,
        }
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

    /// Apply `config`: program the coefficients and keep the poll budget
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPollBudget`] for a zero poll budget.
    pub fn configure(&mut self, config: &FirConfig) -> Result<()> {
        config.validate()?;
        self.set_coefficients(&config.coeffs);
        self.config = *config;
        Ok(())
    }

    /// Configuration in effect
    pub const fn config(&self) -> &FirConfig {
        &self.config
    }

    /// Write the four Q15 coefficients
    ///
    /// Written during a run, they are staged and used from the next run.
    pub fn set_coefficients(&mut self, coeffs: &[i16; FIR_TAPS]) {
        for (tap, &coeff) in coeffs.iter().enumerate() {
            self.bus.write(coeff_offset(tap), u32::from(coeff as u16));
        }
    }

    /// Read back the coefficient registers
    pub fn coefficients(&mut self) -> [i16; FIR_TAPS] {
        let mut coeffs = [0; FIR_TAPS];
        for (tap, coeff) in coeffs.iter_mut().enumerate() {
            *coeff = (self.bus.read(coeff_offset(tap)) & COEFF_MASK) as u16 as i16;
        }
        coeffs
    }

    /// Write `samples` into DATA_IN and set LEN
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TooManySamples`] if more than 32 samples are given
    /// - [`IoError::Busy`] if a run started by this driver has not completed
    pub fn load_samples(&mut self, samples: &[i16]) -> Result<()> {
        if samples.len() > FIR_MAX_SAMPLES {
            return Err(ConfigError::TooManySamples.into());
        }
        if self.in_flight {
            return Err(IoError::Busy.into());
        }

        for (i, &x) in samples.iter().enumerate() {
            self.bus.write(data_in_offset(i), u32::from(x as u16));
        }
        self.bus.write(LEN_OFFSET, samples.len() as u32);
        Ok(())
    }

    /// Programmed LEN, clamped to the array capacity
    pub fn programmed_len(&mut self) -> usize {
        (self.bus.read(LEN_OFFSET) as usize).min(FIR_MAX_SAMPLES)
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Set EN without starting a run
    pub fn enable(&mut self) {
        self.bus.write(CTRL_OFFSET, CTRL_EN);
    }

    /// Clear EN (aborts a run in flight)
    pub fn disable(&mut self) {
        self.bus.write(CTRL_OFFSET, 0);
        self.in_flight = false;
    }

    /// Whether EN is set
    pub fn is_enabled(&mut self) -> bool {
        self.bus.read(CTRL_OFFSET) & CTRL_EN != 0
    }

    /// Clear a stale DONE and pulse START with EN set
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Busy`] if a run started by this driver has not
    /// completed.
    pub fn start(&mut self) -> IoResult<()> {
        if self.in_flight {
            return Err(IoError::Busy);
        }
        self.ack_done();
        self.bus.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        self.in_flight = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("fir: start");
        Ok(())
    }

    /// Abort any run, zero LEN and reinitialize the compute state
    ///
    /// The RESET pulse is written with EN cleared, so the filter is left
    /// disabled and a LEN still staged by a run in flight commits as 0.
    pub fn reset(&mut self) {
        self.bus.write(LEN_OFFSET, 0);
        self.bus.write(CTRL_OFFSET, CTRL_RESET);
        self.in_flight = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("fir: reset");
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Read STATUS
    pub fn status(&mut self) -> FirStatus {
        FirStatus::from_raw(self.bus.read(STATUS_OFFSET))
    }

    /// Whether DONE is set
    pub fn is_done(&mut self) -> bool {
        self.status().done
    }

    /// Acknowledge DONE
    pub fn ack_done(&mut self) {
        self.bus.write(STATUS_OFFSET, STATUS_DONE);
    }

    /// Whether a run started by this driver is still outstanding
    pub const fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Runs completed and acknowledged by this driver
    pub const fn completions(&self) -> u32 {
        self.completions
    }

    /// Interrupt handler body
    ///
    /// Returns `false` if DONE was not set (the interrupt was not ours).
    pub fn handle_interrupt(&mut self) -> bool {
        if !self.is_done() {
            return false;
        }
        self.ack_done();
        self.in_flight = false;
        self.completions = self.completions.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::trace!("fir: done irq, count={=u32}", self.completions);
        true
    }

    /// Busy-wait for DONE, then acknowledge it
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Timeout`] if DONE did not set within `max_polls`
    /// polls.
    pub fn wait_done<D: DelayNs>(&mut self, delay: &mut D, max_polls: u32) -> IoResult<()> {
        for _ in 0..max_polls {
            if self.handle_interrupt() {
                return Ok(());
            }
            delay.delay_us(POLL_INTERVAL_US);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("fir: DONE not set after {=u32} polls", max_polls);
        Err(IoError::Timeout)
    }

    /// Copy DATA_OUT into `out`
    ///
    /// Reads `min(LEN, out.len())` samples and returns how many were read.
    pub fn read_output(&mut self, out: &mut [i16]) -> usize {
        let n = self.programmed_len().min(out.len());
        for (i, y) in out.iter_mut().take(n).enumerate() {
            *y = (self.bus.read(data_out_offset(i)) & SAMPLE_MASK) as u16 as i16;
        }
        n
    }

    /// Filter `samples` into `out` in one blocking call
    ///
    /// Loads the samples, starts a run, waits for DONE using the configured
    /// poll budget and reads the results. Returns the number of outputs.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::OutputTooSmall`] if `out` is shorter than `samples`
    /// - [`ConfigError::TooManySamples`] if more than 32 samples are given
    /// - [`IoError::Busy`] if a previous run is still outstanding
    /// - [`IoError::Timeout`] if the run does not complete
    pub fn process<D: DelayNs>(
        &mut self,
        samples: &[i16],
        out: &mut [i16],
        delay: &mut D,
    ) -> Result<usize> {
        if out.len() < samples.len() {
            return Err(ConfigError::OutputTooSmall.into());
        }

        self.load_samples(samples)?;
        self.start()?;
        if let Err(e) = self.wait_done(delay, self.config.max_polls) {
            self.reset();
            return Err(e.into());
        }
        Ok(self.read_output(out))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
