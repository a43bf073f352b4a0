//! Async/await support for peripheral interrupts.
//!
//! An [`IrqWaker`] holds the task waiting on one interrupt line. The line
//! level and the waker slot are always touched inside the same critical
//! section, so a rising edge cannot fall between a future's check and its
//! registration.

use core::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use critical_section::{CriticalSection, Mutex};

use super::shared::SharedPeripheral;
use crate::device::Peripheral;

/// Task slot for one peripheral interrupt line.
pub struct IrqWaker {
    waiter: Mutex<RefCell<Option<Waker>>>,
}

impl IrqWaker {
    /// Empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            waiter: Mutex::new(RefCell::new(None)),
        }
    }

    fn park(&self, cs: CriticalSection<'_>, waker: &Waker) {
        let mut slot = self.waiter.borrow_ref_mut(cs);
        if !slot.as_ref().is_some_and(|w| w.will_wake(waker)) {
            *slot = Some(waker.clone());
        }
    }

    fn take(&self, cs: CriticalSection<'_>) -> Option<Waker> {
        self.waiter.borrow_ref_mut(cs).take()
    }

    /// Release the parked task, if any
    pub fn release(&self) {
        if let Some(w) = critical_section::with(|cs| self.take(cs)) {
            w.wake();
        }
    }

    /// Whether a task is parked on this line
    pub fn is_parked(&self) -> bool {
        critical_section::with(|cs| self.waiter.borrow_ref(cs).is_some())
    }
}

impl Default for IrqWaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Waker slot for the smart timer line.
pub static TIMER_WAKER: IrqWaker = IrqWaker::new();

/// Waker slot for the FIR filter line.
pub static FIR_WAKER: IrqWaker = IrqWaker::new();

/// Async-aware interrupt handler.
///
/// Samples the peripheral's interrupt line and, if it is high, releases the
/// parked task. The line is left as is; the woken task acknowledges the
/// status bit through its driver.
///
/// # Example
///
/// ```ignore
/// #[interrupt]
/// fn TIMER_IRQ() {
///     ph_mmio_periph::sync::asynch::on_interrupt(&TIMER, &TIMER_WAKER);
/// }
/// ```
pub fn on_interrupt<P: Peripheral>(shared: &SharedPeripheral<P>, waker: &IrqWaker) -> bool {
    let (level, parked) = critical_section::with(|cs| {
        let level = shared.irq_in(cs);
        (level, if level { waker.take(cs) } else { None })
    });
    if let Some(w) = parked {
        w.wake();
    }
    level
}

/// Future that resolves once a shared peripheral's interrupt line is high.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct IrqFuture<'a, P: Peripheral> {
    shared: &'a SharedPeripheral<P>,
    waker: &'a IrqWaker,
}

impl<'a, P: Peripheral> IrqFuture<'a, P> {
    /// Create a new interrupt future.
    pub const fn new(shared: &'a SharedPeripheral<P>, waker: &'a IrqWaker) -> Self {
        Self { shared, waker }
    }
}

impl<P: Peripheral> Future for IrqFuture<'_, P> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        critical_section::with(|cs| {
            if this.shared.irq_in(cs) {
                Poll::Ready(())
            } else {
                this.waker.park(cs, cx.waker());
                Poll::Pending
            }
        })
    }
}

/// Wait for the peripheral's interrupt line.
pub const fn wait_irq<'a, P: Peripheral>(
    shared: &'a SharedPeripheral<P>,
    waker: &'a IrqWaker,
) -> IrqFuture<'a, P> {
    IrqFuture::new(shared, waker)
}

/// Release both parked tasks (call when resetting the peripherals).
pub fn reset_async_state() {
    TIMER_WAKER.release();
    FIR_WAKER.release();
}
