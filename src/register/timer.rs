//! Smart timer register map
//!
//! | Offset | Name   | Fields                                   | Reset |
//! |--------|--------|------------------------------------------|-------|
//! | 0x0    | CTRL   | bit0 EN (RW)                             | 0     |
//! | 0x4    | STATUS | bit0 WRAP (W1C), bit1 UPD_PENDING (RO)   | 0     |
//! | 0x8    | PERIOD | RW, shadowed while the timer runs        | 0xFF  |
//! | 0xC    | DUTY   | RW, shadowed while the timer runs        | 0xAA  |

use super::{FieldDesc, RegisterDesc, RegisterMap};
use crate::constants::{TIMER_DUTY_RESET, TIMER_PERIOD_RESET};

// =============================================================================
// Register Offsets
// =============================================================================

/// Control register offset
pub const CTRL_OFFSET: u32 = 0x0;
/// Status register offset
pub const STATUS_OFFSET: u32 = 0x4;
/// Period register offset
pub const PERIOD_OFFSET: u32 = 0x8;
/// Duty register offset
pub const DUTY_OFFSET: u32 = 0xC;

// =============================================================================
// Bit Definitions
// =============================================================================

/// Timer enable (bit 0)
pub const CTRL_EN: u32 = 1 << 0;

/// Wrap event, write 1 to clear (bit 0)
pub const STATUS_WRAP: u32 = 1 << 0;
/// Shadow PERIOD/DUTY write waiting for commit (bit 1)
pub const STATUS_UPD_PENDING: u32 = 1 << 1;

/// PERIOD field mask
pub const PERIOD_MASK: u32 = 0xFFFF_FFFF;
/// DUTY field mask
pub const DUTY_MASK: u32 = 0xFFFF_FFFF;

// =============================================================================
// Map
// =============================================================================

/// Number of storage slots in [`TIMER_MAP`]
pub const TIMER_SLOTS: usize = 4;

const CTRL_FIELDS: &[FieldDesc] = &[FieldDesc::rw("EN", CTRL_EN, 0)];

const STATUS_FIELDS: &[FieldDesc] = &[
    FieldDesc::w1c("WRAP", STATUS_WRAP),
    FieldDesc::ro("UPD_PENDING", STATUS_UPD_PENDING),
];

const PERIOD_FIELDS: &[FieldDesc] = &[FieldDesc::rw("PERIOD", PERIOD_MASK, TIMER_PERIOD_RESET)];

const DUTY_FIELDS: &[FieldDesc] = &[FieldDesc::rw("DUTY", DUTY_MASK, TIMER_DUTY_RESET)];

/// Smart timer register map
pub const TIMER_MAP: RegisterMap = RegisterMap {
    name: "smarttimer",
    registers: &[
        RegisterDesc::single("CTRL", CTRL_OFFSET, CTRL_FIELDS),
        RegisterDesc::single("STATUS", STATUS_OFFSET, STATUS_FIELDS),
        RegisterDesc::single("PERIOD", PERIOD_OFFSET, PERIOD_FIELDS),
        RegisterDesc::single("DUTY", DUTY_OFFSET, DUTY_FIELDS),
    ],
};
