//! Tick Source Adapter

use tickswitch_platform::Platform;

use crate::{Kernel, SchedulerCore};

impl<P: Platform, S: SchedulerCore> Kernel<P, S> {
    /// Body of the tick exception: advance the time base once with
    /// interrupts masked, then arm the deferred switch if preemptive.
    ///
    /// The switch cannot run before this returns, since it sits below the
    /// tick in priority.
    pub fn on_tick(&self) {
        let was_masked = self.platform.mask_from_isr();
        self.core.advance_tick();
        self.platform.unmask_from_isr(was_masked);

        if self.config.preemption {
            tick_log!(trace, "tick, switch armed");
            self.platform.pend_switch();
        }
    }

    /// `ctx` is the kernel the tick source was bound with.
    pub(crate) fn tick_trampoline(ctx: *mut ()) {
        let kernel = unsafe { &*(ctx as *const Self) };
        kernel.on_tick();
    }
}
