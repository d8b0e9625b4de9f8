//! Context-Switch Trap
//!
//! The exception vectors perform SaveCurrent and RestoreNext on the
//! registers themselves; what they need from the kernel is where to put
//! the saved frame and where the next one is. Both answers come from here.

use core::sync::atomic::Ordering;

use tickswitch_platform::{Platform, StackWord, TrapHandler};

use crate::task::TaskRef;
use crate::{Kernel, SchedulerCore};

impl<P: Platform, S: SchedulerCore> Kernel<P, S> {
    /// SelectNext: the only writer of the current-task reference.
    pub(crate) fn select_next(&self) -> TaskRef {
        let was_masked = self.platform.mask_from_isr();
        let next = self.core.select_next_task();
        self.current.store(next.as_ptr(), Ordering::Release);
        self.platform.unmask_from_isr(was_masked);
        next
    }

    fn trapped_task(&self) -> TaskRef {
        if !self.platform.in_interrupt() || !self.is_started() {
            panic!("switch trap invoked outside its exception vector");
        }
        match self.current_task() {
            Some(task) => task,
            None => panic!("switch trap with no current task"),
        }
    }
}

impl<P: Platform, S: SchedulerCore> TrapHandler for Kernel<P, S> {
    unsafe fn switch(&self, saved: *mut StackWord) -> *mut StackWord {
        let current = self.trapped_task();
        debug_assert_eq!(self.critical_nesting(), 0, "switch taken inside a critical section");

        if !self.launched.load(Ordering::Acquire) {
            // taken between unmasking and the launching trap: `saved` is boot
            // scratch and no task has run yet
            switch_log!(trace, "switch before launch, first task kept");
            return unsafe { current.saved_stack_pointer() };
        }

        unsafe { current.set_saved_stack_pointer(saved) };
        let next = self.select_next();

        let switches = self.switches.load(Ordering::Relaxed);
        self.switches.store(switches.wrapping_add(1), Ordering::Release);
        switch_log!(trace, "switch {:x} -> {:x}", current.as_ptr() as usize, next.as_ptr() as usize);

        unsafe { next.saved_stack_pointer() }
    }

    unsafe fn first_task(&self) -> *mut StackWord {
        let first = self.trapped_task();
        self.launched.store(true, Ordering::Release);
        switch_log!(trace, "first task {:x}", first.as_ptr() as usize);
        unsafe { first.saved_stack_pointer() }
    }
}
