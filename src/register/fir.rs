//! FIR filter register map
//!
//! | Offset      | Name          | Fields                                        |
//! |-------------|---------------|-----------------------------------------------|
//! | 0x00        | CTRL          | bit0 EN (RW), bit1 START (W1P), bit2 RESET (W1P) |
//! | 0x04        | STATUS        | bit0 DONE (W1C), bit1 UPD_PENDING (RO)        |
//! | 0x08        | LEN           | RW, 6 bits, shadowed during a run             |
//! | 0x10-0x1C   | COEFF0-3      | RW, 16-bit Q15, shadowed during a run         |
//! | 0x100-0x17C | DATA_IN[0..31]  | RW, 16-bit samples                          |
//! | 0x200-0x27C | DATA_OUT[0..31] | RO, 16-bit Q15 results                      |
//!
//! LEN is six bits wide so that the full capacity (32) is expressible; the
//! engine clamps larger values to [`FIR_MAX_SAMPLES`].

use super::{FieldDesc, RegisterDesc, RegisterMap};
use crate::constants::{FIR_MAX_SAMPLES, FIR_TAPS};

// =============================================================================
// Register Offsets
// =============================================================================

/// Control register offset
pub const CTRL_OFFSET: u32 = 0x000;
/// Status register offset
pub const STATUS_OFFSET: u32 = 0x004;
/// Sample count register offset
pub const LEN_OFFSET: u32 = 0x008;
/// First coefficient register offset
pub const COEFF0_OFFSET: u32 = 0x010;
/// First input sample offset
pub const DATA_IN_OFFSET: u32 = 0x100;
/// First output sample offset
pub const DATA_OUT_OFFSET: u32 = 0x200;

// =============================================================================
// Bit Definitions
// =============================================================================

/// Engine enable (bit 0)
pub const CTRL_EN: u32 = 1 << 0;
/// Start a run, write-one-to-pulse (bit 1)
pub const CTRL_START: u32 = 1 << 1;
/// Reinitialize compute state, write-one-to-pulse (bit 2)
pub const CTRL_RESET: u32 = 1 << 2;

/// Run complete, write 1 to clear (bit 0)
pub const STATUS_DONE: u32 = 1 << 0;
/// Shadow LEN/COEFF write waiting for commit (bit 1)
pub const STATUS_UPD_PENDING: u32 = 1 << 1;

/// LEN field mask
pub const LEN_MASK: u32 = 0x3F;
/// COEFF field mask (Q15)
pub const COEFF_MASK: u32 = 0xFFFF;
/// DATA_IN / DATA_OUT sample mask
pub const SAMPLE_MASK: u32 = 0xFFFF;

/// Byte offset of coefficient `tap`
pub const fn coeff_offset(tap: usize) -> u32 {
    COEFF0_OFFSET + tap as u32 * 4
}

/// Byte offset of input sample `index`
pub const fn data_in_offset(index: usize) -> u32 {
    DATA_IN_OFFSET + index as u32 * 4
}

/// Byte offset of output sample `index`
pub const fn data_out_offset(index: usize) -> u32 {
    DATA_OUT_OFFSET + index as u32 * 4
}

// =============================================================================
// Map
// =============================================================================

/// Number of storage slots in [`FIR_MAP`]
pub const FIR_SLOTS: usize = 3 + FIR_TAPS + 2 * FIR_MAX_SAMPLES;

const CTRL_FIELDS: &[FieldDesc] = &[
    FieldDesc::rw("EN", CTRL_EN, 0),
    FieldDesc::w1p("START", CTRL_START),
    FieldDesc::w1p("RESET", CTRL_RESET),
];

const STATUS_FIELDS: &[FieldDesc] = &[
    FieldDesc::w1c("DONE", STATUS_DONE),
    FieldDesc::ro("UPD_PENDING", STATUS_UPD_PENDING),
];

const LEN_FIELDS: &[FieldDesc] = &[FieldDesc::rw("LEN", LEN_MASK, 0)];

const COEFF_FIELDS: &[FieldDesc] = &[FieldDesc::rw("COEFF", COEFF_MASK, 0)];

const DATA_IN_FIELDS: &[FieldDesc] = &[FieldDesc::rw("SAMPLE", SAMPLE_MASK, 0)];

const DATA_OUT_FIELDS: &[FieldDesc] = &[FieldDesc::ro("SAMPLE", SAMPLE_MASK)];

/// FIR filter register map
pub const FIR_MAP: RegisterMap = RegisterMap {
    name: "fir",
    registers: &[
        RegisterDesc::single("CTRL", CTRL_OFFSET, CTRL_FIELDS),
        RegisterDesc::single("STATUS", STATUS_OFFSET, STATUS_FIELDS),
        RegisterDesc::single("LEN", LEN_OFFSET, LEN_FIELDS),
        RegisterDesc::array("COEFF", COEFF0_OFFSET, FIR_TAPS, COEFF_FIELDS),
        RegisterDesc::array("DATA_IN", DATA_IN_OFFSET, FIR_MAX_SAMPLES, DATA_IN_FIELDS),
        RegisterDesc::array("DATA_OUT", DATA_OUT_OFFSET, FIR_MAX_SAMPLES, DATA_OUT_FIELDS),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_matches_map() {
        assert_eq!(FIR_MAP.slots(), FIR_SLOTS);
    }

    #[test]
    fn array_offsets_cover_documented_ranges() {
        assert_eq!(coeff_offset(3), 0x1C);
        assert_eq!(data_in_offset(FIR_MAX_SAMPLES - 1), 0x17C);
        assert_eq!(data_out_offset(FIR_MAX_SAMPLES - 1), 0x27C);
    }

    #[test]
    fn len_field_can_express_capacity() {
        assert!(FIR_MAX_SAMPLES as u32 <= LEN_MASK);
    }

    #[test]
    fn gaps_are_unmapped() {
        assert!(FIR_MAP.decode(0x0C).is_err());
        assert!(FIR_MAP.decode(0x180).is_err());
        assert!(FIR_MAP.decode(0x280).is_err());
    }
}
