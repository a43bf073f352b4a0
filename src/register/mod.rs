//! Register map declarations and access policy
//!
//! Registers are described by `const` tables rather than by per-register
//! code paths. Each [`RegisterDesc`] names an offset, an element count (for
//! address-mapped arrays such as `DATA_IN[]`) and a list of [`FieldDesc`]
//! bitfields, each carrying an [`Access`] policy and a reset value.
//!
//! [`apply_write`] and [`read_view`] implement the policies for any field
//! list, so a new register is added by declaring it in a map.
//!
//! Bits not covered by a field are reserved: they read as zero and ignore
//! writes.

pub mod file;
pub mod fir;
pub mod timer;

use crate::constants::WORD_BYTES;
use crate::error::BusFault;

// =============================================================================
// Access Policy
// =============================================================================

/// Per-bitfield access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read/write: stores the written bits literally
    Rw,
    /// Read-only: bus writes are ignored, the owning engine drives the bits
    Ro,
    /// Write-one-to-clear: a written 1 clears the bit, a written 0 is a no-op
    W1c,
    /// Write-one-to-pulse: a written 1 raises a one-tick pulse, never stored
    W1p,
}

/// A named bitfield within a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    /// Field name (for diagnostics)
    pub name: &'static str,
    /// Bits covered by the field, in register position
    pub mask: u32,
    /// Access policy
    pub access: Access,
    /// Reset value, in register position
    pub reset: u32,
}

impl FieldDesc {
    /// Read/write field
    pub const fn rw(name: &'static str, mask: u32, reset: u32) -> Self {
        Self {
            name,
            mask,
            access: Access::Rw,
            reset: reset & mask,
        }
    }

    /// Read-only field (engine driven, resets to zero)
    pub const fn ro(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            access: Access::Ro,
            reset: 0,
        }
    }

    /// Write-one-to-clear status field (resets to zero)
    pub const fn w1c(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            access: Access::W1c,
            reset: 0,
        }
    }

    /// Write-one-to-pulse command field
    pub const fn w1p(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            access: Access::W1p,
            reset: 0,
        }
    }
}

/// A register (or register array) in a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDesc {
    /// Register name (for diagnostics)
    pub name: &'static str,
    /// Byte offset of the first element
    pub offset: u32,
    /// Number of consecutive 32-bit elements
    pub count: usize,
    /// Bitfields
    pub fields: &'static [FieldDesc],
}

impl RegisterDesc {
    /// Single register
    pub const fn single(name: &'static str, offset: u32, fields: &'static [FieldDesc]) -> Self {
        Self {
            name,
            offset,
            count: 1,
            fields,
        }
    }

    /// Array of identical registers with a one-word stride
    pub const fn array(
        name: &'static str,
        offset: u32,
        count: usize,
        fields: &'static [FieldDesc],
    ) -> Self {
        Self {
            name,
            offset,
            count,
            fields,
        }
    }

    /// Reset value of each element
    pub const fn reset_value(&self) -> u32 {
        let mut value = 0;
        let mut i = 0;
        while i < self.fields.len() {
            value |= self.fields[i].reset;
            i += 1;
        }
        value
    }

    /// Bits carrying the given access policy
    pub const fn mask_of(&self, access: Access) -> u32 {
        let mut mask = 0;
        let mut i = 0;
        while i < self.fields.len() {
            if self.fields[i].access as u8 == access as u8 {
                mask |= self.fields[i].mask;
            }
            i += 1;
        }
        mask
    }

    /// Byte span covered by the register
    pub const fn span(&self) -> u32 {
        self.count as u32 * WORD_BYTES
    }

    /// Element index for `address`, if it falls inside this register
    pub const fn element(&self, address: u32) -> Option<usize> {
        if address >= self.offset && address < self.offset + self.span() {
            Some(((address - self.offset) / WORD_BYTES) as usize)
        } else {
            None
        }
    }
}

/// A complete register map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    /// Peripheral name (for diagnostics)
    pub name: &'static str,
    /// Registers, in ascending offset order
    pub registers: &'static [RegisterDesc],
}

/// Result of decoding a bus address against a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The register hit
    pub register: &'static RegisterDesc,
    /// Element index within the register array
    pub index: usize,
    /// Storage slot in the register file
    pub slot: usize,
}

impl RegisterMap {
    /// Number of 32-bit storage slots the map needs
    pub const fn slots(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.registers.len() {
            total += self.registers[i].count;
            i += 1;
        }
        total
    }

    /// Decode a byte address into a register, element and storage slot
    pub fn decode(&self, address: u32) -> Result<Decoded, BusFault> {
        if address % WORD_BYTES != 0 {
            return Err(BusFault::MisalignedAddress(address));
        }

        let mut slot = 0;
        for register in self.registers {
            if let Some(index) = register.element(address) {
                return Ok(Decoded {
                    register,
                    index,
                    slot: slot + index,
                });
            }
            slot += register.count;
        }

        Err(BusFault::UnmappedAddress(address))
    }
}

// =============================================================================
// Policy Application
// =============================================================================

/// Outcome of applying a bus write to a stored word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteEffect {
    /// New stored word
    pub stored: u32,
    /// W1P bits written as 1 (one-tick pulses for the owning engine)
    pub pulses: u32,
    /// W1C bits that went from 1 to 0
    pub cleared: u32,
}

/// Apply a bus write of `written` to the stored word `current`
pub fn apply_write(fields: &[FieldDesc], current: u32, written: u32) -> WriteEffect {
    let mut effect = WriteEffect {
        stored: current,
        ..WriteEffect::default()
    };

    for field in fields {
        let bits = written & field.mask;
        match field.access {
            Access::Rw => effect.stored = (effect.stored & !field.mask) | bits,
            Access::Ro => {}
            Access::W1c => {
                effect.cleared |= effect.stored & bits;
                effect.stored &= !bits;
            }
            Access::W1p => {
                effect.pulses |= bits;
                effect.stored &= !field.mask;
            }
        }
    }

    effect
}

/// Bus-visible view of a stored word: W1P and reserved bits read as zero
pub fn read_view(fields: &[FieldDesc], stored: u32) -> u32 {
    fields
        .iter()
        .filter(|field| field.access != Access::W1p)
        .fold(0, |view, field| view | (stored & field.mask))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL_FIELDS: &[FieldDesc] = &[
        FieldDesc::rw("EN", 1 << 0, 0),
        FieldDesc::w1p("START", 1 << 1),
        FieldDesc::w1p("RESET", 1 << 2),
    ];

    const STATUS_FIELDS: &[FieldDesc] = &[
        FieldDesc::w1c("DONE", 1 << 0),
        FieldDesc::ro("UPD_PENDING", 1 << 1),
    ];

    const DATA_FIELDS: &[FieldDesc] = &[FieldDesc::rw("VALUE", 0xFFFF, 0x12)];

    static MAP: RegisterMap = RegisterMap {
        name: "test",
        registers: &[
            RegisterDesc::single("CTRL", 0x0, CTRL_FIELDS),
            RegisterDesc::single("STATUS", 0x4, STATUS_FIELDS),
            RegisterDesc::array("DATA", 0x10, 4, DATA_FIELDS),
        ],
    };

    #[test]
    fn rw_field_stores_and_truncates() {
        let fields = [FieldDesc::rw("VALUE", 0xFF, 0)];
        let effect = apply_write(&fields, 0, 0x1234);
        assert_eq!(effect.stored, 0x34);
    }

    #[test]
    fn ro_field_ignores_writes() {
        let effect = apply_write(STATUS_FIELDS, 0b10, 0b10);
        assert_eq!(effect.stored & 0b10, 0b10);

        let effect = apply_write(STATUS_FIELDS, 0b00, 0b10);
        assert_eq!(effect.stored & 0b10, 0);
    }

    #[test]
    fn w1c_clears_only_written_ones() {
        let effect = apply_write(STATUS_FIELDS, 0b11, 0b01);
        assert_eq!(effect.stored, 0b10);
        assert_eq!(effect.cleared, 0b01);

        let effect = apply_write(STATUS_FIELDS, 0b01, 0b00);
        assert_eq!(effect.stored, 0b01);
        assert_eq!(effect.cleared, 0);
    }

    #[test]
    fn w1c_second_write_is_noop() {
        let first = apply_write(STATUS_FIELDS, 0b01, 0b01);
        let second = apply_write(STATUS_FIELDS, first.stored, 0b01);
        assert_eq!(first.stored, second.stored);
        assert_eq!(second.cleared, 0);
    }

    #[test]
    fn w1p_pulses_without_storing() {
        let effect = apply_write(CTRL_FIELDS, 0, 0b111);
        assert_eq!(effect.stored, 0b001);
        assert_eq!(effect.pulses, 0b110);
        assert_eq!(read_view(CTRL_FIELDS, effect.stored | 0b110), 0b001);
    }

    #[test]
    fn reserved_bits_read_zero() {
        assert_eq!(read_view(STATUS_FIELDS, 0xFFFF_FFFF), 0b11);
    }

    #[test]
    fn descriptor_masks_and_reset() {
        let ctrl = &MAP.registers[0];
        assert_eq!(ctrl.mask_of(Access::W1p), 0b110);
        assert_eq!(ctrl.mask_of(Access::Rw), 0b001);
        assert_eq!(MAP.registers[2].reset_value(), 0x12);
    }

    #[test]
    fn decode_resolves_slots() {
        assert_eq!(MAP.slots(), 6);

        let status = MAP.decode(0x4).unwrap();
        assert_eq!(status.register.name, "STATUS");
        assert_eq!(status.slot, 1);

        let data = MAP.decode(0x1C).unwrap();
        assert_eq!(data.register.name, "DATA");
        assert_eq!(data.index, 3);
        assert_eq!(data.slot, 5);
    }

    #[test]
    fn decode_rejects_holes_and_misalignment() {
        assert_eq!(MAP.decode(0x8), Err(BusFault::UnmappedAddress(0x8)));
        assert_eq!(MAP.decode(0x20), Err(BusFault::UnmappedAddress(0x20)));
        assert_eq!(MAP.decode(0x2), Err(BusFault::MisalignedAddress(0x2)));
    }
}
