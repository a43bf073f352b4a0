//! Timer wrap engine
//!
//! A free-running counter that restarts at 0 on the enable edge, counts up
//! once per tick and wraps after reaching the active PERIOD, so WRAP fires
//! every `PERIOD + 1` ticks. PERIOD = 0 wraps on every tick; no division is
//! involved anywhere.
//!
//! The output-compare line follows the active DUTY according to
//! [`DutyCompare`].

/// Output-compare convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyCompare {
    /// High while `counter < DUTY` (DUTY ticks per period)
    #[default]
    Below,
    /// High while `counter <= DUTY` (DUTY + 1 ticks per period)
    AtOrBelow,
}

impl DutyCompare {
    /// Compare output for a counter value
    #[inline]
    pub const fn output(self, counter: u32, duty: u32) -> bool {
        match self {
            DutyCompare::Below => counter < duty,
            DutyCompare::AtOrBelow => counter <= duty,
        }
    }
}

/// Counter behaviour on the EN falling edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterOnDisable {
    /// Counter returns to 0
    #[default]
    Reset,
    /// Counter keeps its value (it restarts from 0 on the next enable edge)
    Hold,
}

/// Timer engine options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerOptions {
    /// Output-compare convention
    pub duty_compare: DutyCompare,
    /// Counter behaviour when disabled
    pub counter_on_disable: CounterOnDisable,
}

impl TimerOptions {
    /// Default options: `counter < DUTY`, counter reset on disable
    pub const fn new() -> Self {
        Self {
            duty_compare: DutyCompare::Below,
            counter_on_disable: CounterOnDisable::Reset,
        }
    }

    /// Set the output-compare convention
    #[must_use]
    pub const fn with_duty_compare(mut self, duty_compare: DutyCompare) -> Self {
        self.duty_compare = duty_compare;
        self
    }

    /// Set the counter behaviour on disable
    #[must_use]
    pub const fn with_counter_on_disable(mut self, policy: CounterOnDisable) -> Self {
        self.counter_on_disable = policy;
        self
    }
}

/// Events produced by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerEvents {
    /// EN rising edge seen this tick
    pub enabled: bool,
    /// EN falling edge seen this tick (shadow commit trigger)
    pub disabled: bool,
    /// Counter wrapped this tick (sets STATUS.WRAP)
    pub wrapped: bool,
    /// Full period completed (shadow commit trigger)
    pub cycle_complete: bool,
    /// Output-compare level after this tick
    pub compare: bool,
}

/// Free-running counter state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerWrapEngine {
    options: TimerOptions,
    counter: u32,
    running: bool,
    compare: bool,
}

impl TimerWrapEngine {
    /// Idle engine
    pub const fn new(options: TimerOptions) -> Self {
        Self {
            options,
            counter: 0,
            running: false,
            compare: false,
        }
    }

    /// Return to idle
    pub fn reset(&mut self) {
        *self = Self::new(self.options);
    }

    /// Advance one tick with the current EN level and active configuration
    pub fn tick(&mut self, enable: bool, period: u32, duty: u32) -> TimerEvents {
        let mut events = TimerEvents::default();

        match (self.running, enable) {
            (false, false) => {}
            (false, true) => {
                self.running = true;
                self.counter = 0;
                events.enabled = true;
            }
            (true, false) => {
                self.running = false;
                if self.options.counter_on_disable == CounterOnDisable::Reset {
                    self.counter = 0;
                }
                events.disabled = true;
            }
            (true, true) => {
                if self.counter >= period {
                    self.counter = 0;
                    events.wrapped = true;
                    events.cycle_complete = true;
                } else {
                    self.counter += 1;
                }
            }
        }

        self.compare = self.running && self.options.duty_compare.output(self.counter, duty);
        events.compare = self.compare;
        events
    }

    /// Current counter value
    #[inline]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Whether the engine is counting
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Output-compare line
    #[inline]
    pub const fn compare_output(&self) -> bool {
        self.compare
    }

    /// Options in effect
    #[inline]
    pub const fn options(&self) -> TimerOptions {
        self.options
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
