//! FIR filter peripheral
//!
//! Software loads up to 32 samples into `DATA_IN[]`, programs LEN and four
//! Q15 coefficients, sets EN and pulses START. The engine consumes one sample
//! per tick, writes `DATA_OUT[]` and raises STATUS.DONE (and the interrupt
//! line) when LEN samples have been produced.
//!
//! LEN and COEFF are shadowed while a run is in flight; staged values commit
//! when the run completes or EN drops. A RESET pulse leaves them staged.
//! START and RESET are W1P: a bus write latches the pulse and the next tick
//! consumes it.

use super::{FaultLog, Peripheral};
use crate::constants::FIR_TAPS;
use crate::engine::fir::{FirComputeEngine, FirControl, FirSettings, FirState};
use crate::engine::interrupt::InterruptUnit;
use crate::engine::shadow::{Routing, ShadowCommitEngine};
use crate::error::BusFault;
use crate::hal::bus::RegisterBus;
use crate::register::file::RegisterFile;
use crate::register::fir::{
    CTRL_EN, CTRL_OFFSET, CTRL_RESET, CTRL_START, DATA_IN_OFFSET, DATA_OUT_OFFSET, FIR_MAP,
    FIR_SLOTS, LEN_OFFSET, SAMPLE_MASK, STATUS_DONE, STATUS_OFFSET, STATUS_UPD_PENDING,
    coeff_offset,
};

/// Shadowed FIR configuration fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum FirField {
    Len,
    Coeff(usize),
}

impl From<FirField> for usize {
    fn from(field: FirField) -> usize {
        match field {
            FirField::Len => 0,
            FirField::Coeff(tap) => 1 + tap,
        }
    }
}

const SHADOW_SLOTS: usize = 1 + FIR_TAPS;
const SHADOW_DEFAULTS: [u32; SHADOW_SLOTS] = [0; SHADOW_SLOTS];

/// Register-mapped streaming FIR filter
#[derive(Debug, Clone)]
pub struct FirFilter {
    regs: RegisterFile<FIR_SLOTS>,
    shadow: ShadowCommitEngine<SHADOW_SLOTS>,
    engine: FirComputeEngine,
    irq: InterruptUnit,
    pulses: u32,
    faults: FaultLog,
}

impl Default for FirFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FirFilter {
    /// Filter in its reset state
    pub const fn new() -> Self {
        Self {
            regs: RegisterFile::new(&FIR_MAP),
            shadow: ShadowCommitEngine::new(SHADOW_DEFAULTS),
            engine: FirComputeEngine::new(),
            irq: InterruptUnit::new(STATUS_DONE),
            pulses: 0,
            faults: FaultLog::new(),
        }
    }

    /// Sequencer state
    pub const fn state(&self) -> FirState {
        self.engine.state()
    }

    /// Next sample index the running engine will consume
    pub const fn cursor(&self) -> usize {
        self.engine.cursor()
    }

    /// LEN and coefficients a new run would latch
    pub fn active_settings(&self) -> FirSettings {
        let mut coeffs = [0; FIR_TAPS];
        for (tap, coeff) in coeffs.iter_mut().enumerate() {
            *coeff = self.shadow.active(FirField::Coeff(tap));
        }
        FirSettings::from_registers(self.shadow.active(FirField::Len), coeffs)
    }

    /// Whether a LEN/COEFF write is waiting for commit
    pub fn update_pending(&self) -> bool {
        self.shadow.pending()
    }

    /// Most recent undecodable bus request
    pub const fn last_fault(&self) -> Option<BusFault> {
        self.faults.last()
    }

    /// Undecodable bus requests since reset
    pub const fn fault_count(&self) -> u32 {
        self.faults.count()
    }

    /// Config field behind a shadowed register address
    fn shadowed_field(address: u32) -> Option<FirField> {
        if address == LEN_OFFSET {
            return Some(FirField::Len);
        }
        (0..FIR_TAPS)
            .find(|&tap| coeff_offset(tap) == address)
            .map(FirField::Coeff)
    }

    fn route(&mut self, field: FirField, value: u32) {
        let active = self.engine.is_running();
        if self.shadow.maybe_stage_or_apply(field, value, active) == Routing::Staged {
            #[cfg(feature = "defmt")]
            defmt::debug!("fir: staged {} = {=u32:#x}", field, value);
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

impl RegisterBus for FirFilter {
    fn read(&mut self, address: u32) -> u32 {
        match self.regs.read(address) {
            Ok(value) => value,
            Err(fault) => {
                self.faults.record(FIR_MAP.name, fault);
                0
            }
        }
    }

    fn write(&mut self, address: u32, value: u32) {
        let effect = match self.regs.write(address, value) {
            Ok(effect) => effect,
            Err(fault) => {
                self.faults.record(FIR_MAP.name, fault);
                return;
            }
        };

        if address == CTRL_OFFSET {
            self.pulses |= effect.pulses;
        } else if let Some(field) = Self::shadowed_field(address) {
            self.route(field, effect.stored);
        }
    }
}

impl Peripheral for FirFilter {
    fn tick(&mut self) {
        let control = FirControl {
            enable: self.regs.get(CTRL_OFFSET) & CTRL_EN != 0,
            start: self.pulses & CTRL_START != 0,
            reset: self.pulses & CTRL_RESET != 0,
        };
        self.pulses = 0;

        let settings = self.active_settings();
        let regs = &self.regs;
        let events = self.engine.tick(control, settings, |index| {
            regs.get_indexed(DATA_IN_OFFSET, index) as u16 as i16
        });

        if let Some((index, y)) = events.output {
            self.regs
                .hw_store_indexed(DATA_OUT_OFFSET, index, SAMPLE_MASK, u32::from(y as u16));
        }

        #[cfg(feature = "defmt")]
        {
            if events.started {
                defmt::debug!("fir: start len={=usize}", settings.len);
            }
            if events.cleared {
                defmt::debug!("fir: reset (aborted={=bool})", events.aborted);
            }
            if events.start_ignored {
                defmt::trace!("fir: START ignored in {}", self.engine.state());
            }
        }

        if events.done {
            self.regs.hw_set(STATUS_OFFSET, STATUS_DONE);
            #[cfg(feature = "defmt")]
            defmt::debug!("fir: done");
        }

        if (events.done || events.disabled) && self.shadow.commit() {
            #[cfg(feature = "defmt")]
            defmt::debug!("fir: shadow committed");
        }
        self.sync_pending();

        if let Some(edge) = self.irq.update(self.regs.get(STATUS_OFFSET)) {
            #[cfg(feature = "defmt")]
            defmt::trace!("fir: irq {}", edge);
            #[cfg(not(feature = "defmt"))]
            let _ = edge;
        }
    }

    fn reset(&mut self) {
        self.regs.reset();
        self.shadow.reset(SHADOW_DEFAULTS);
        self.engine.reset();
        self.irq.reset();
        self.pulses = 0;
        self.faults.clear();
        #[cfg(feature = "defmt")]
        defmt::info!("fir: reset");
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
    use crate::constants::{FIR_MAX_SAMPLES, Q15_ONE, Q15_QUARTER};
    use crate::register::fir::{data_in_offset, data_out_offset};

    fn program(fir: &mut FirFilter, coeffs: [i16; FIR_TAPS], samples: &[i16]) {
        for (tap, &c) in coeffs.iter().enumerate() {
            fir.write(coeff_offset(tap), u32::from(c as u16));
        }
        for (i, &x) in samples.iter().enumerate() {
            fir.write(data_in_offset(i), u32::from(x as u16));
        }
        fir.write(LEN_OFFSET, samples.len() as u32);
        fir.write(CTRL_OFFSET, CTRL_EN);
    }

    fn run_to_done(fir: &mut FirFilter) -> usize {
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        for ticks in 1..=2 * FIR_MAX_SAMPLES {
            fir.tick();
            if fir.read(STATUS_OFFSET) & STATUS_DONE != 0 {
                return ticks;
            }
        }
        panic!("FIR never finished");
    }

    fn outputs(fir: &mut FirFilter, n: usize) -> Vec<i16> {
        (0..n)
            .map(|i| fir.read(data_out_offset(i)) as u16 as i16)
            .collect()
    }

    #[test]
    fn reset_defaults() {
        let mut fir = FirFilter::new();
        for address in [CTRL_OFFSET, STATUS_OFFSET, LEN_OFFSET, coeff_offset(0)] {
            assert_eq!(fir.read(address), 0);
        }
        assert_eq!(fir.read(data_in_offset(31)), 0);
        assert_eq!(fir.read(data_out_offset(31)), 0);
        assert_eq!(fir.state(), FirState::Idle);
    }

    #[test]
    fn passthrough() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[0x1234]);
        run_to_done(&mut fir);
        assert_eq!(fir.read(data_out_offset(0)), 0x1233);
    }

    #[test]
    fn averaging_ramp() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_QUARTER; FIR_TAPS], &[4, 8, 12, 16, 20]);
        let ticks = run_to_done(&mut fir);
        assert_eq!(ticks, 6);
        assert_eq!(outputs(&mut fir, 5), [1, 3, 6, 10, 14]);
    }

    #[test]
    fn negative_samples_round_trip_through_registers() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[-1000, i16::MIN]);
        run_to_done(&mut fir);
        assert_eq!(outputs(&mut fir, 2), [-1000, i16::MIN + 1]);
    }

    #[test]
    fn w1p_bits_read_zero_after_write() {
        let mut fir = FirFilter::new();
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START | CTRL_RESET);
        assert_eq!(fir.read(CTRL_OFFSET), CTRL_EN);
        fir.tick();
        assert_eq!(fir.read(CTRL_OFFSET), CTRL_EN);
    }

    #[test]
    fn done_raises_irq_and_w1c_drops_it() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[1, 2, 3]);
        run_to_done(&mut fir);
        assert!(fir.irq());

        fir.write(STATUS_OFFSET, STATUS_DONE);
        assert!(!fir.irq());
        fir.write(STATUS_OFFSET, STATUS_DONE);
        assert_eq!(fir.read(STATUS_OFFSET), 0);
    }

    #[test]
    fn zero_len_run_is_done_on_start_tick() {
        let mut fir = FirFilter::new();
        fir.write(CTRL_OFFSET, CTRL_EN);
        assert_eq!(run_to_done(&mut fir), 1);
        assert_eq!(fir.state(), FirState::Done);
    }

    #[test]
    fn start_without_enable_is_ignored() {
        let mut fir = FirFilter::new();
        fir.write(LEN_OFFSET, 1);
        fir.write(CTRL_OFFSET, CTRL_START);
        fir.tick_n(4);
        assert_eq!(fir.state(), FirState::Idle);
        assert_eq!(fir.read(STATUS_OFFSET), 0);
    }

    #[test]
    fn len_above_capacity_is_clamped() {
        let mut fir = FirFilter::new();
        fir.write(LEN_OFFSET, 0x3F);
        assert_eq!(fir.read(LEN_OFFSET), 0x3F);
        assert_eq!(fir.active_settings().len, FIR_MAX_SAMPLES);

        fir.write(LEN_OFFSET, 0x1_0005);
        assert_eq!(fir.read(LEN_OFFSET), 0x05);
    }

    #[test]
    fn config_written_mid_run_commits_at_done() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[10, 20, 30, 40]);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        fir.tick_n(2);
        assert_eq!(fir.state(), FirState::Running);

        fir.write(coeff_offset(0), 0);
        fir.write(LEN_OFFSET, 2);
        assert!(fir.update_pending());
        assert_ne!(fir.read(STATUS_OFFSET) & STATUS_UPD_PENDING, 0);
        assert_eq!(fir.active_settings().len, 4);

        fir.tick_n(3);
        assert_eq!(fir.state(), FirState::Done);
        // the in-flight run kept its latched coefficients
        assert_eq!(fir.read(data_out_offset(3)) as u16 as i16, 39);
        assert!(!fir.update_pending());
        assert_eq!(fir.active_settings().len, 2);
        assert_eq!(fir.read(STATUS_OFFSET) & STATUS_UPD_PENDING, 0);
    }

    #[test]
    fn reset_pulse_preempts_run() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[5; 8]);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        fir.tick_n(3);
        assert!(fir.cursor() > 0);

        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_RESET);
        fir.tick();

        assert_eq!(fir.state(), FirState::Idle);
        assert_eq!(fir.cursor(), 0);
        assert_eq!(fir.read(STATUS_OFFSET) & STATUS_DONE, 0);
        fir.tick_n(10);
        assert_eq!(fir.read(STATUS_OFFSET) & STATUS_DONE, 0);
    }

    #[test]
    fn reset_pulse_keeps_staged_config() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[5; 8]);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        fir.tick_n(2);
        fir.write(LEN_OFFSET, 3);
        assert!(fir.update_pending());

        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_RESET);
        fir.tick();
        assert_eq!(fir.state(), FirState::Idle);
        assert!(fir.update_pending());
        assert_eq!(fir.active_settings().len, 8);
        assert_ne!(fir.read(STATUS_OFFSET) & STATUS_UPD_PENDING, 0);

        // the EN falling edge is the next commit point
        fir.write(CTRL_OFFSET, 0);
        fir.tick();
        assert!(!fir.update_pending());
        assert_eq!(fir.active_settings().len, 3);
    }

    #[test]
    fn reset_pulse_while_idle_stays_idle() {
        let mut fir = FirFilter::new();
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_RESET);
        fir.tick();
        assert_eq!(fir.state(), FirState::Idle);
        assert_eq!(fir.read(STATUS_OFFSET), 0);

        program(&mut fir, [Q15_ONE, 0, 0, 0], &[0x1234, 0x0100]);
        run_to_done(&mut fir);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_RESET);
        fir.tick();

        assert_eq!(fir.state(), FirState::Idle);
        assert_eq!(fir.cursor(), 0);
        // DONE and the outputs survive; only the bus clears DONE
        assert!(fir.irq());
        assert_eq!(fir.read(data_out_offset(0)), 0x1233);

        fir.write(STATUS_OFFSET, STATUS_DONE);
        assert_eq!(run_to_done(&mut fir), 3);
        assert_eq!(outputs(&mut fir, 2), [0x1233, 0x00FF]);
    }

    #[test]
    fn saturates_through_data_registers() {
        let mut fir = FirFilter::new();
        program(&mut fir, [i16::MAX; FIR_TAPS], &[i16::MAX; 4]);
        run_to_done(&mut fir);

        let raw: Vec<u32> = (0..4).map(|i| fir.read(data_out_offset(i))).collect();
        assert_eq!(raw, [0x7ffe, 0x7fff, 0x7fff, 0x7fff]);
    }

    #[test]
    fn reset_wins_over_simultaneous_start() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[5]);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START | CTRL_RESET);
        fir.tick();
        assert_eq!(fir.state(), FirState::Idle);
    }

    #[test]
    fn disable_mid_run_aborts() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 0, 0, 0], &[5; 8]);
        fir.write(CTRL_OFFSET, CTRL_EN | CTRL_START);
        fir.tick_n(2);

        fir.write(CTRL_OFFSET, 0);
        fir.tick();
        assert_eq!(fir.state(), FirState::Idle);
        assert!(!fir.irq());
    }

    #[test]
    fn data_out_is_read_only() {
        let mut fir = FirFilter::new();
        fir.write(data_out_offset(0), 0x55);
        assert_eq!(fir.read(data_out_offset(0)), 0);
        assert_eq!(fir.fault_count(), 0);
    }

    #[test]
    fn gaps_in_the_map_are_faults() {
        let mut fir = FirFilter::new();
        assert_eq!(fir.read(0x0C), 0);
        fir.write(0x180, 1);
        assert_eq!(fir.fault_count(), 2);
        assert_eq!(fir.last_fault(), Some(BusFault::UnmappedAddress(0x180)));
    }

    #[test]
    fn peripheral_reset_restores_everything() {
        let mut fir = FirFilter::new();
        program(&mut fir, [Q15_ONE, 1, 2, 3], &[7, 7]);
        run_to_done(&mut fir);

        fir.reset();

        assert_eq!(fir.state(), FirState::Idle);
        assert_eq!(fir.read(STATUS_OFFSET), 0);
        assert_eq!(fir.read(data_out_offset(0)), 0);
        assert_eq!(fir.read(coeff_offset(3)), 0);
        assert_eq!(fir.active_settings(), FirSettings::default());
        assert!(!fir.irq());
    }
}
