//! Yield Requester
//!
//! Neither request switches inline. Both only arm the deferred switch
//! exception, so every switch goes through the trap.

use tickswitch_platform::Platform;

use crate::{Kernel, SchedulerCore};

impl<P: Platform, S: SchedulerCore> Kernel<P, S> {
    /// Give up the processor from task context.
    ///
    /// With interrupts unmasked the switch has happened by the time this
    /// returns. Inside a critical section it is taken when the section is
    /// left. Does nothing before the scheduler starts.
    pub fn yield_now(&self) {
        if !self.is_started() {
            return;
        }
        switch_log!(trace, "yield");
        self.platform.pend_switch();
        self.platform.synchronize();
    }

    /// Arm a switch from an interrupt handler. Returns at once; the
    /// switch runs after the last active handler returns. Repeated
    /// requests before then result in one switch.
    pub fn request_switch_from_interrupt(&self) {
        if !self.is_started() {
            return;
        }
        self.platform.pend_switch();
    }
}
