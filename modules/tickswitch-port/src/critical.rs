//! Critical Section Guard

use core::sync::atomic::Ordering;

use tickswitch_platform::Platform;

use crate::{Kernel, SchedulerCore};

impl<P: Platform, S: SchedulerCore> Kernel<P, S> {
    /// Mask interrupts and go one level deeper. Callable from tasks and
    /// handlers.
    pub fn enter_critical(&self) {
        self.platform.disable_interrupts();
        let nesting = self.nesting.load(Ordering::Relaxed);
        self.nesting.store(nesting + 1, Ordering::Relaxed);
    }

    /// Leave one level; interrupts are unmasked when the last level is
    /// left.
    ///
    /// # Panics
    /// If no critical section is open.
    pub fn exit_critical(&self) {
        let nesting = self.nesting.load(Ordering::Relaxed);
        if nesting == 0 {
            panic!("exit_critical without a matching enter_critical");
        }
        self.nesting.store(nesting - 1, Ordering::Relaxed);
        if nesting == 1 {
            self.platform.enable_interrupts();
        }
    }

    /// Enter a critical section left when the guard drops.
    pub fn critical(&self) -> CriticalGuard<'_, P, S> {
        self.enter_critical();
        CriticalGuard { kernel: self }
    }

    pub fn critical_nesting(&self) -> usize {
        self.nesting.load(Ordering::Relaxed)
    }
}

/// An open critical section; see [`Kernel::critical`].
#[must_use = "the critical section ends when the guard is dropped"]
pub struct CriticalGuard<'a, P: Platform, S: SchedulerCore> {
    kernel: &'a Kernel<P, S>,
}

impl<P: Platform, S: SchedulerCore> Drop for CriticalGuard<'_, P, S> {
    fn drop(&mut self) {
        self.kernel.exit_critical();
    }
}
