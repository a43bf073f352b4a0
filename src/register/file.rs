//! Register file: storage plus bus-side and engine-side access
//!
//! The bus side ([`RegisterFile::read`], [`RegisterFile::write`]) applies the
//! declared [`Access`] policies. The engine side ([`RegisterFile::hw_set`],
//! [`RegisterFile::hw_store`]) bypasses them, with the constraint that an
//! engine may set W1C bits but never clear them.

use super::{Access, RegisterMap, WriteEffect, apply_write, read_view};
use crate::constants::WORD_BYTES;
use crate::error::BusFault;

/// Word storage for every register in a [`RegisterMap`]
///
/// `SLOTS` must equal [`RegisterMap::slots`] for the map.
#[derive(Debug, Clone)]
pub struct RegisterFile<const SLOTS: usize> {
    map: &'static RegisterMap,
    words: [u32; SLOTS],
}

impl<const SLOTS: usize> RegisterFile<SLOTS> {
    /// Create a register file holding the map's reset values
    pub const fn new(map: &'static RegisterMap) -> Self {
        assert!(map.slots() == SLOTS, "slot count does not match register map");
        Self {
            map,
            words: Self::reset_words(map),
        }
    }

    const fn reset_words(map: &'static RegisterMap) -> [u32; SLOTS] {
        let mut words = [0u32; SLOTS];
        let mut slot = 0;
        let mut r = 0;
        while r < map.registers.len() {
            let register = &map.registers[r];
            let reset = register.reset_value();
            let mut i = 0;
            while i < register.count {
                words[slot] = reset;
                slot += 1;
                i += 1;
            }
            r += 1;
        }
        words
    }

    /// The map this file was built from
    pub const fn map(&self) -> &'static RegisterMap {
        self.map
    }

    /// Restore every register to its reset value
    pub fn reset(&mut self) {
        self.words = Self::reset_words(self.map);
    }

    /// Bus read: W1P and reserved bits observe zero
    pub fn read(&self, address: u32) -> Result<u32, BusFault> {
        let decoded = self.map.decode(address)?;
        Ok(read_view(decoded.register.fields, self.words[decoded.slot]))
    }

    /// Bus write: applies the per-field access policy
    pub fn write(&mut self, address: u32, value: u32) -> Result<WriteEffect, BusFault> {
        let decoded = self.map.decode(address)?;
        let effect = apply_write(decoded.register.fields, self.words[decoded.slot], value);
        self.words[decoded.slot] = effect.stored;
        Ok(effect)
    }

    /// Bus-visible value, or zero for an address outside the map
    pub fn get(&self, address: u32) -> u32 {
        self.read(address).unwrap_or(0)
    }

    /// Bus-visible value of element `index` of the array at `base`
    pub fn get_indexed(&self, base: u32, index: usize) -> u32 {
        self.get(base + index as u32 * WORD_BYTES)
    }

    /// Engine side: set bits (status flags, W1C events)
    pub fn hw_set(&mut self, address: u32, bits: u32) {
        if let Ok(decoded) = self.map.decode(address) {
            self.words[decoded.slot] |= bits;
        } else {
            debug_assert!(false, "engine access to unmapped address {address:#x}");
        }
    }

    /// Engine side: replace the bits under `mask` with `value`
    ///
    /// W1C bits may only be set this way, never cleared.
    pub fn hw_store(&mut self, address: u32, mask: u32, value: u32) {
        let Ok(decoded) = self.map.decode(address) else {
            debug_assert!(false, "engine access to unmapped address {address:#x}");
            return;
        };

        let slot = &mut self.words[decoded.slot];
        let w1c = decoded.register.mask_of(Access::W1c) & mask;
        debug_assert!(
            *slot & w1c & !value == 0,
            "engine may not clear W1C bits in {}",
            decoded.register.name
        );
        *slot = (*slot & !mask) | (value & mask);
    }

    /// Engine side: store element `index` of the array at `base`
    pub fn hw_store_indexed(&mut self, base: u32, index: usize, mask: u32, value: u32) {
        self.hw_store(base + index as u32 * WORD_BYTES, mask, value);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
