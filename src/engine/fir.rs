//! Streaming 4-tap FIR compute engine
//!
//! On a START pulse (with EN set) the engine zeroes its tap history and
//! processes one DATA_IN sample per tick:
//!
//! ```text
//! history = [x[n], x[n-1], x[n-2], x[n-3]]
//! y[n]    = sat16((sum(history[k] * coeff[k])) >> 15)
//! ```
//!
//! The accumulator is 64-bit so the four Q15 products never wrap; the
//! arithmetic shift floors toward negative infinity and the result saturates
//! to the signed 16-bit range. After LEN samples the engine reports
//! completion and sits in [`FirState::Done`] until the next START or RESET.

use crate::constants::{FIR_MAX_SAMPLES, FIR_TAPS, Q15_FRAC_BITS};

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirState {
    /// Waiting for START
    #[default]
    Idle,
    /// Streaming samples
    Running,
    /// Last run finished; accepts a new START
    Done,
}

/// Control inputs sampled on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirControl {
    /// CTRL.EN level
    pub enable: bool,
    /// START pulse
    pub start: bool,
    /// RESET pulse
    pub reset: bool,
}

/// Configuration latched at START
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirSettings {
    /// Number of samples to process (clamped to the array capacity)
    pub len: usize,
    /// Q15 tap coefficients
    pub coeffs: [i16; FIR_TAPS],
}

impl FirSettings {
    /// Settings from raw LEN and COEFF register words
    pub fn from_registers(len: u32, coeffs: [u32; FIR_TAPS]) -> Self {
        Self {
            len: (len as usize).min(FIR_MAX_SAMPLES),
            coeffs: coeffs.map(|c| c as u16 as i16),
        }
    }
}

/// Events produced by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirEvents {
    /// A run started this tick
    pub started: bool,
    /// Output sample produced this tick: `(index, value)`
    pub output: Option<(usize, i16)>,
    /// Run completed this tick (sets STATUS.DONE, shadow commit trigger)
    pub done: bool,
    /// In-flight run discarded by RESET or disable
    pub aborted: bool,
    /// RESET pulse reinitialized the compute state
    pub cleared: bool,
    /// EN falling edge seen this tick (shadow commit trigger)
    pub disabled: bool,
    /// START ignored (EN low or a run in flight)
    pub start_ignored: bool,
}

/// FIR sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirComputeEngine {
    state: FirState,
    settings: FirSettings,
    history: [i16; FIR_TAPS],
    cursor: usize,
    was_enabled: bool,
}

impl Default for FirComputeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FirComputeEngine {
    /// Idle engine with zeroed history
    pub const fn new() -> Self {
        Self {
            state: FirState::Idle,
            settings: FirSettings {
                len: 0,
                coeffs: [0; FIR_TAPS],
            },
            history: [0; FIR_TAPS],
            cursor: 0,
            was_enabled: false,
        }
    }

    /// Return to idle with zeroed history
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one tick
    ///
    /// `settings` is latched only when a run starts; `input` reads
    /// `DATA_IN[index]` for the sample consumed this tick.
    pub fn tick<F>(&mut self, control: FirControl, settings: FirSettings, input: F) -> FirEvents
    where
        F: FnOnce(usize) -> i16,
    {
        let mut events = FirEvents::default();

        let enable_fell = self.was_enabled && !control.enable;
        self.was_enabled = control.enable;
        events.disabled = enable_fell;

        if control.reset {
            events.aborted = self.state == FirState::Running;
            events.start_ignored = control.start;
            self.history = [0; FIR_TAPS];
            self.cursor = 0;
            self.state = FirState::Idle;
            events.cleared = true;
            return events;
        }

        if enable_fell && self.state == FirState::Running {
            self.state = FirState::Idle;
            events.aborted = true;
        }

        if control.start && control.enable && self.state != FirState::Running {
            self.begin(settings, &mut events);
        } else {
            events.start_ignored = control.start;
            if self.state == FirState::Running {
                self.step(input, &mut events);
            }
        }

        events
    }

    fn begin(&mut self, settings: FirSettings, events: &mut FirEvents) {
        self.settings = FirSettings {
            len: settings.len.min(FIR_MAX_SAMPLES),
            ..settings
        };
        self.history = [0; FIR_TAPS];
        self.cursor = 0;
        events.started = true;

        if self.settings.len == 0 {
            self.state = FirState::Done;
            events.done = true;
        } else {
            self.state = FirState::Running;
        }
    }

    fn step<F>(&mut self, input: F, events: &mut FirEvents)
    where
        F: FnOnce(usize) -> i16,
    {
        self.history.copy_within(0..FIR_TAPS - 1, 1);
        self.history[0] = input(self.cursor);

        let y = q15_mac(&self.history, &self.settings.coeffs);
        events.output = Some((self.cursor, y));
        self.cursor += 1;

        if self.cursor >= self.settings.len {
            self.state = FirState::Done;
            events.done = true;
        }
    }

    /// Current state
    #[inline]
    pub const fn state(&self) -> FirState {
        self.state
    }

    /// Whether a run is in flight
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, FirState::Running)
    }

    /// Next DATA_IN index to consume
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Tap history, newest sample first
    #[inline]
    pub const fn history(&self) -> [i16; FIR_TAPS] {
        self.history
    }

    /// Settings latched by the last START
    #[inline]
    pub const fn settings(&self) -> FirSettings {
        self.settings
    }
}

// =============================================================================
// Fixed-point Arithmetic
// =============================================================================

/// Q15 multiply-accumulate over the tap history, saturated to 16 bits
pub fn q15_mac(history: &[i16; FIR_TAPS], coeffs: &[i16; FIR_TAPS]) -> i16 {
    let acc: i64 = history
        .iter()
        .zip(coeffs.iter())
        .map(|(&x, &c)| i64::from(x) * i64::from(c))
        .sum();
    saturate_i16(acc >> Q15_FRAC_BITS)
}

/// Clamp to the signed 16-bit range
#[inline]
pub fn saturate_i16(value: i64) -> i16 {
    value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

// =============================================================================
// Unit Tests
// =============================================================================
