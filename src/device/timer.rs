//! Smart timer peripheral
//!
//! A free-running counter with a wrap event and an output-compare line.
//! PERIOD and DUTY are shadowed while the timer is enabled: writes land in
//! the shadow bank and reach the counter on the next wrap or when EN drops.
//! The register keeps the last value written by the bus, so a read returns
//! what was written even while it is still pending.
//!
//! The interrupt output follows STATUS.WRAP.

use super::{FaultLog, Peripheral};
use crate::constants::{TIMER_DUTY_RESET, TIMER_PERIOD_RESET};
use crate::engine::interrupt::InterruptUnit;
use crate::engine::shadow::{Routing, ShadowCommitEngine};
use crate::engine::timer::{TimerOptions, TimerWrapEngine};
use crate::error::BusFault;
use crate::hal::bus::RegisterBus;
use crate::register::file::RegisterFile;
use crate::register::timer::{
    CTRL_EN, CTRL_OFFSET, DUTY_OFFSET, PERIOD_OFFSET, STATUS_OFFSET, STATUS_UPD_PENDING,
    STATUS_WRAP, TIMER_MAP, TIMER_SLOTS,
};

/// Shadowed timer configuration fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum TimerField {
    Period = 0,
    Duty = 1,
}

impl From<TimerField> for usize {
    fn from(field: TimerField) -> usize {
        field as usize
    }
}

const SHADOW_DEFAULTS: [u32; 2] = [TIMER_PERIOD_RESET, TIMER_DUTY_RESET];

/// Register-mapped timer with shadowed PERIOD/DUTY
#[derive(Debug, Clone)]
pub struct SmartTimer {
    regs: RegisterFile<TIMER_SLOTS>,
    shadow: ShadowCommitEngine<2>,
    engine: TimerWrapEngine,
    irq: InterruptUnit,
    faults: FaultLog,
}

impl Default for SmartTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartTimer {
    /// Timer in its reset state with default options
    pub const fn new() -> Self {
        Self::with_options(TimerOptions::new())
    }

    /// Timer in its reset state with the given engine options
    pub const fn with_options(options: TimerOptions) -> Self {
        Self {
            regs: RegisterFile::new(&TIMER_MAP),
            shadow: ShadowCommitEngine::new(SHADOW_DEFAULTS),
            engine: TimerWrapEngine::new(options),
            irq: InterruptUnit::new(STATUS_WRAP),
            faults: FaultLog::new(),
        }
    }

    /// Current counter value
    pub const fn counter(&self) -> u32 {
        self.engine.counter()
    }

    /// Output-compare line
    pub const fn compare_output(&self) -> bool {
        self.engine.compare_output()
    }

    /// Whether the counter is running
    pub const fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// PERIOD the counter is using
    pub fn active_period(&self) -> u32 {
        self.shadow.active(TimerField::Period)
    }

    /// DUTY the counter is using
    pub fn active_duty(&self) -> u32 {
        self.shadow.active(TimerField::Duty)
    }

    /// Whether a PERIOD/DUTY write is waiting for commit
    pub fn update_pending(&self) -> bool {
        self.shadow.pending()
    }

    /// Engine options in effect
    pub const fn options(&self) -> TimerOptions {
        self.engine.options()
    }

    /// Most recent undecodable bus request
    pub const fn last_fault(&self) -> Option<BusFault> {
        self.faults.last()
    }

    /// Undecodable bus requests since reset
    pub const fn fault_count(&self) -> u32 {
        self.faults.count()
    }

    fn enabled(&self) -> bool {
        self.regs.get(CTRL_OFFSET) & CTRL_EN != 0
    }

    fn route(&mut self, field: TimerField, value: u32) {
        let active = self.enabled() || self.engine.is_running();
        if self.shadow.maybe_stage_or_apply(field, value, active) == Routing::Staged {
            #[cfg(feature = "defmt")]
            defmt::debug!("smarttimer: staged {} = {=u32}", field, value);
        }
        self.sync_pending();
    }

    fn sync_pending(&mut self) {
        let pending = if self.shadow.pending() {
            STATUS_UPD_PENDING
        } else {
            0
        };
        self.regs.hw_store(STATUS_OFFSET, STATUS_UPD_PENDING, pending);
    }
}

impl RegisterBus for SmartTimer {
    fn read(&mut self, address: u32) -> u32 {
        match self.regs.read(address) {
            Ok(value) => value,
            Err(fault) => {
                self.faults.record(TIMER_MAP.name, fault);
                0
            }
        }
    }

    fn write(&mut self, address: u32, value: u32) {
        let effect = match self.regs.write(address, value) {
            Ok(effect) => effect,
            Err(fault) => {
                self.faults.record(TIMER_MAP.name, fault);
                return;
            }
        };

        match address {
            PERIOD_OFFSET => self.route(TimerField::Period, effect.stored),
            DUTY_OFFSET => self.route(TimerField::Duty, effect.stored),
            _ => {}
        }
    }
}

impl Peripheral for SmartTimer {
    fn tick(&mut self) {
        let events = self.engine.tick(
            self.enabled(),
            self.shadow.active(TimerField::Period),
            self.shadow.active(TimerField::Duty),
        );

        #[cfg(feature = "defmt")]
        {
            if events.enabled {
                defmt::debug!("smarttimer: enabled");
            }
            if events.disabled {
                defmt::debug!("smarttimer: disabled");
            }
        }

        if events.wrapped {
            self.regs.hw_set(STATUS_OFFSET, STATUS_WRAP);
            #[cfg(feature = "defmt")]
            defmt::trace!("smarttimer: wrap");
        }

        if (events.cycle_complete || events.disabled) && self.shadow.commit() {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "smarttimer: commit period={=u32} duty={=u32}",
                self.active_period(),
                self.active_duty()
            );
        }
        self.sync_pending();

        if let Some(edge) = self.irq.update(self.regs.get(STATUS_OFFSET)) {
            #[cfg(feature = "defmt")]
            defmt::trace!("smarttimer: irq {}", edge);
            #[cfg(not(feature = "defmt"))]
            let _ = edge;
        }
    }

    fn reset(&mut self) {
        self.regs.reset();
        self.shadow.reset(SHADOW_DEFAULTS);
        self.engine.reset();
        self.irq.reset();
        self.faults.clear();
        #[cfg(feature = "defmt")]
        defmt::info!("smarttimer: reset");
    }

    fn irq(&self) -> bool {
        self.irq.level(self.regs.get(STATUS_OFFSET))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use crate::engine::timer::DutyCompare;

    fn enabled_timer(period: u32, duty: u32) -> SmartTimer {
        let mut timer = SmartTimer::new();
        timer.write(PERIOD_OFFSET, period);
        timer.write(DUTY_OFFSET, duty);
        timer.write(CTRL_OFFSET, CTRL_EN);
        timer.tick();
        timer
    }

    /// Ticks at which WRAP was observed, acknowledging each one.
    fn wrap_ticks(timer: &mut SmartTimer, ticks: usize) -> Vec<usize> {
        let mut wraps = Vec::new();
        for t in 0..ticks {
            timer.tick();
            if timer.read(STATUS_OFFSET) & STATUS_WRAP != 0 {
                wraps.push(t);
                timer.write(STATUS_OFFSET, STATUS_WRAP);
            }
        }
        wraps
    }

    #[test]
    fn reset_defaults() {
        let mut timer = SmartTimer::new();
        assert_eq!(timer.read(CTRL_OFFSET), 0);
        assert_eq!(timer.read(STATUS_OFFSET), 0);
        assert_eq!(timer.read(PERIOD_OFFSET), 0xFF);
        assert_eq!(timer.read(DUTY_OFFSET), 0xAA);
        assert!(!timer.irq());
    }

    #[test]
    fn wrap_spacing_is_period_plus_one() {
        for period in [0u32, 1, 3, 8, 20] {
            let mut timer = enabled_timer(period, 0);
            let wraps = wrap_ticks(&mut timer, 5 * (period as usize + 1));
            assert!(wraps.len() >= 4, "period {period}");
            for pair in wraps.windows(2) {
                assert_eq!(pair[1] - pair[0], period as usize + 1, "period {period}");
            }
        }
    }

    #[test]
    fn duty_high_for_first_d_ticks_of_each_period() {
        let (period, duty) = (9u32, 3u32);
        let mut timer = enabled_timer(period, duty);

        let mut levels = std::vec![timer.compare_output()];
        for _ in 0..period {
            timer.tick();
            levels.push(timer.compare_output());
        }

        assert_eq!(levels.iter().filter(|&&high| high).count(), duty as usize);
        assert!(levels[..duty as usize].iter().all(|&high| high));
    }

    #[test]
    fn inclusive_duty_option() {
        let options = TimerOptions::new().with_duty_compare(DutyCompare::AtOrBelow);
        let mut timer = SmartTimer::with_options(options);
        timer.write(PERIOD_OFFSET, 9);
        timer.write(DUTY_OFFSET, 3);
        timer.write(CTRL_OFFSET, CTRL_EN);

        let mut high = 0;
        for _ in 0..10 {
            timer.tick();
            high += usize::from(timer.compare_output());
        }
        assert_eq!(high, 4);
    }

    #[test]
    fn w1c_clear_is_idempotent() {
        let mut timer = enabled_timer(0, 0);
        timer.tick();
        assert_ne!(timer.read(STATUS_OFFSET) & STATUS_WRAP, 0);

        timer.write(CTRL_OFFSET, 0);
        timer.tick();

        timer.write(STATUS_OFFSET, STATUS_WRAP);
        let after_first = timer.read(STATUS_OFFSET);
        timer.write(STATUS_OFFSET, STATUS_WRAP);
        assert_eq!(timer.read(STATUS_OFFSET), after_first);
        assert_eq!(after_first & STATUS_WRAP, 0);
    }

    #[test]
    fn writing_zero_to_status_is_noop() {
        let mut timer = enabled_timer(0, 0);
        timer.tick();
        timer.write(STATUS_OFFSET, 0);
        assert_ne!(timer.read(STATUS_OFFSET) & STATUS_WRAP, 0);
    }

    #[test]
    fn upd_pending_is_read_only() {
        let mut timer = SmartTimer::new();
        timer.write(STATUS_OFFSET, STATUS_UPD_PENDING);
        assert_eq!(timer.read(STATUS_OFFSET), 0);
    }

    #[test]
    fn shadow_commits_on_disable_edge() {
        let mut timer = enabled_timer(100, 10);
        timer.tick_n(5);

        timer.write(PERIOD_OFFSET, 20);
        assert_eq!(timer.active_period(), 100);
        assert_eq!(timer.read(PERIOD_OFFSET), 20);
        assert_ne!(timer.read(STATUS_OFFSET) & STATUS_UPD_PENDING, 0);

        timer.tick_n(3);
        assert_eq!(timer.active_period(), 100);

        timer.write(CTRL_OFFSET, 0);
        timer.tick();

        assert_eq!(timer.active_period(), 20);
        assert_eq!(timer.read(STATUS_OFFSET) & STATUS_UPD_PENDING, 0);
    }

    #[test]
    fn shadow_commits_on_wrap() {
        let mut timer = enabled_timer(4, 0);
        timer.write(PERIOD_OFFSET, 7);
        timer.write(DUTY_OFFSET, 2);
        timer.write(PERIOD_OFFSET, 9);

        timer.tick_n(4);
        assert_eq!(timer.active_period(), 4);
        assert!(timer.update_pending());

        timer.tick();
        assert_eq!(timer.active_period(), 9);
        assert_eq!(timer.active_duty(), 2);
        assert!(!timer.update_pending());
    }

    #[test]
    fn writes_while_disabled_apply_immediately() {
        let mut timer = SmartTimer::new();
        timer.write(PERIOD_OFFSET, 33);
        assert_eq!(timer.active_period(), 33);
        assert_eq!(timer.read(STATUS_OFFSET), 0);
    }

    #[test]
    fn irq_drops_in_the_same_tick_as_clear() {
        let mut timer = enabled_timer(50, 0);
        timer.tick_n(51);
        assert!(timer.irq());

        let period = timer.read(PERIOD_OFFSET);
        let duty = timer.read(DUTY_OFFSET);
        timer.write(STATUS_OFFSET, STATUS_WRAP);

        assert!(!timer.irq());
        assert_eq!(timer.read(PERIOD_OFFSET), period);
        assert_eq!(timer.read(DUTY_OFFSET), duty);
        assert_eq!(timer.active_period(), 50);
    }

    #[test]
    fn disabled_timer_never_wraps() {
        for (period, duty) in [(0u32, 0u32), (1, 5), (0xFFFF_FFFF, 0)] {
            let mut timer = SmartTimer::new();
            timer.write(PERIOD_OFFSET, period);
            timer.write(DUTY_OFFSET, duty);
            for _ in 0..200 {
                timer.tick();
                assert_eq!(timer.read(STATUS_OFFSET) & STATUS_WRAP, 0);
                assert!(!timer.irq());
                assert!(!timer.compare_output());
            }
        }
    }

    #[test]
    fn unmapped_access_is_recorded_not_fatal() {
        let mut timer = SmartTimer::new();
        assert_eq!(timer.read(0x10), 0);
        timer.write(0x40, 0xDEAD);
        timer.write(0x6, 1);

        assert_eq!(timer.fault_count(), 3);
        assert_eq!(timer.last_fault(), Some(BusFault::MisalignedAddress(0x6)));
        assert_eq!(timer.read(CTRL_OFFSET), 0);
    }

    #[test]
    fn reset_restores_defaults_and_idles_engine() {
        let mut timer = enabled_timer(3, 1);
        timer.write(PERIOD_OFFSET, 8);
        timer.tick_n(4);

        timer.reset();

        assert!(!timer.is_running());
        assert_eq!(timer.counter(), 0);
        assert_eq!(timer.read(CTRL_OFFSET), 0);
        assert_eq!(timer.read(STATUS_OFFSET), 0);
        assert_eq!(timer.read(PERIOD_OFFSET), 0xFF);
        assert_eq!(timer.active_period(), 0xFF);
        assert!(!timer.update_pending());
    }
}
