//! Level-sensitive interrupt derivation
//!
//! The line is the OR of the monitored STATUS bits. [`InterruptUnit::level`]
//! is combinational, so a W1C write that clears the last monitored bit drops
//! the line in the same tick. [`InterruptUnit::update`] keeps a registered
//! copy of the line to report edges.

/// Interrupt line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqEdge {
    /// Line went high
    Rising,
    /// Line went low
    Falling,
}

/// Interrupt line driven by a set of STATUS bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptUnit {
    mask: u32,
    line: bool,
}

impl InterruptUnit {
    /// Monitor the STATUS bits in `mask`
    pub const fn new(mask: u32) -> Self {
        Self { mask, line: false }
    }

    /// Monitored STATUS bits
    #[inline]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// Line level for a STATUS word
    #[inline]
    pub const fn level(&self, status: u32) -> bool {
        status & self.mask != 0
    }

    /// Sample STATUS and report an edge if the line changed
    pub fn update(&mut self, status: u32) -> Option<IrqEdge> {
        let level = self.level(status);
        let edge = match (self.line, level) {
            (false, true) => Some(IrqEdge::Rising),
            (true, false) => Some(IrqEdge::Falling),
            _ => None,
        };
        self.line = level;
        edge
    }

    /// Last sampled line level
    #[inline]
    pub const fn line(&self) -> bool {
        self.line
    }

    /// Drop the registered line
    pub fn reset(&mut self) {
        self.line = false;
    }
}
