//! Shadow / active double-buffering of configuration registers
//!
//! A configuration write that arrives while the owning engine is active is
//! staged in a shadow slot instead of reaching the engine. Staged values move
//! to the active side together, in one step, when the engine reports a
//! commit trigger (disable edge or cycle completion).

/// A value with an active copy and an optional staged replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staged<T: Copy> {
    active: T,
    shadow: Option<T>,
}

impl<T: Copy> Staged<T> {
    /// Create with `value` active and nothing staged
    pub const fn new(value: T) -> Self {
        Self {
            active: value,
            shadow: None,
        }
    }

    /// Value the engine currently uses
    #[inline]
    pub const fn active(&self) -> T {
        self.active
    }

    /// Most recently written value (staged if pending, else active)
    #[inline]
    pub fn visible(&self) -> T {
        self.shadow.unwrap_or(self.active)
    }

    /// Whether a staged value is waiting for commit
    #[inline]
    pub const fn is_pending(&self) -> bool {
        self.shadow.is_some()
    }

    /// Stage `value` for the next commit (last write wins)
    #[inline]
    pub fn stage(&mut self, value: T) {
        self.shadow = Some(value);
    }

    /// Apply `value` immediately, discarding anything staged
    #[inline]
    pub fn apply(&mut self, value: T) {
        self.active = value;
        self.shadow = None;
    }

    /// Move the staged value to the active side; returns whether one existed
    #[inline]
    pub fn commit(&mut self) -> bool {
        match self.shadow.take() {
            Some(value) => {
                self.active = value;
                true
            }
            None => false,
        }
    }
}

/// How a configuration write was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routing {
    /// Engine inactive: value went straight to the active side
    Applied,
    /// Engine active: value staged until the next commit trigger
    Staged,
}

/// A bank of `N` shadowed 32-bit configuration fields
///
/// Fields are addressed by index; each peripheral defines a small enum that
/// converts into `usize` for its own register group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowCommitEngine<const N: usize> {
    slots: [Staged<u32>; N],
}

impl<const N: usize> ShadowCommitEngine<N> {
    /// Create a bank with the given active values and nothing staged
    pub const fn new(defaults: [u32; N]) -> Self {
        let mut slots = [Staged::new(0); N];
        let mut i = 0;
        while i < N {
            slots[i] = Staged::new(defaults[i]);
            i += 1;
        }
        Self { slots }
    }

    /// Drop anything staged and restore `defaults` as the active values
    pub fn reset(&mut self, defaults: [u32; N]) {
        *self = Self::new(defaults);
    }

    /// Stage `value` for `field`
    pub fn stage(&mut self, field: impl Into<usize>, value: u32) {
        self.slots[field.into()].stage(value);
    }

    /// Commit every staged field at once; returns whether anything moved
    ///
    /// Calling this with nothing staged is a no-op.
    pub fn commit(&mut self) -> bool {
        self.slots
            .iter_mut()
            .fold(false, |moved, slot| slot.commit() | moved)
    }

    /// Apply directly when the engine is inactive, stage otherwise
    pub fn maybe_stage_or_apply(
        &mut self,
        field: impl Into<usize>,
        value: u32,
        engine_active: bool,
    ) -> Routing {
        let slot = &mut self.slots[field.into()];
        if engine_active {
            slot.stage(value);
            Routing::Staged
        } else {
            slot.apply(value);
            Routing::Applied
        }
    }

    /// Active value of `field`
    pub fn active(&self, field: impl Into<usize>) -> u32 {
        self.slots[field.into()].active()
    }

    /// Most recently written value of `field`
    pub fn visible(&self, field: impl Into<usize>) -> u32 {
        self.slots[field.into()].visible()
    }

    /// UPD_PENDING: whether any field is staged
    pub fn pending(&self) -> bool {
        self.slots.iter().any(Staged::is_pending)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
