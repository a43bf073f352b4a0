//! ISR-safe peripheral wrapper using critical sections.
//!
//! Provides [`SharedPeripheral`] so a peripheral model can live in a
//! `static` and be clocked from one context while its interrupt is serviced
//! from another.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};

use crate::device::{FirFilter, Peripheral, SmartTimer};

/// ISR-safe peripheral wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// static TIMER: SharedTimer = SharedPeripheral::new(SmartTimer::new());
///
/// TIMER.with(|timer| {
///     timer.write(PERIOD_OFFSET, 99);
///     timer.write(CTRL_OFFSET, CTRL_EN);
/// });
/// ```
pub struct SharedPeripheral<P: Peripheral> {
    inner: Mutex<RefCell<P>>,
}

/// Shared smart timer
pub type SharedTimer = SharedPeripheral<SmartTimer>;

/// Shared FIR filter
pub type SharedFir = SharedPeripheral<FirFilter>;

impl<P: Peripheral> SharedPeripheral<P> {
    /// Wrap a peripheral (const, suitable for static initialization).
    pub const fn new(peripheral: P) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(peripheral)),
        }
    }

    /// Execute a closure with exclusive access to the peripheral.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut P) -> R,
    {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut P) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut p| f(&mut p))
        })
    }

    /// Advance the peripheral one tick
    #[inline]
    pub fn tick(&self) {
        self.with(P::tick);
    }

    /// Advance `n` ticks inside a single critical section
    pub fn run(&self, n: u32) {
        self.with(|p| p.tick_n(n));
    }

    /// Level of the interrupt output
    #[inline]
    pub fn irq(&self) -> bool {
        critical_section::with(|cs| self.irq_in(cs))
    }

    /// Interrupt level sampled inside a critical section the caller holds.
    pub(crate) fn irq_in(&self, cs: CriticalSection<'_>) -> bool {
        self.inner.borrow_ref(cs).irq()
    }
}

impl<P: Peripheral + Default> Default for SharedPeripheral<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}
