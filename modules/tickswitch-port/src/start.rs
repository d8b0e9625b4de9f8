//! First-Task Bootstrap

use core::sync::atomic::Ordering;

use tickswitch_cfg::{SWITCH_PRIORITY, TICK_PRIORITY};
use tickswitch_platform::{Platform, TickSource};

use crate::kernel::Kernel;
use crate::{ConfigError, SchedulerCore};

impl<P: Platform + 'static, S: SchedulerCore + 'static> Kernel<P, S> {
    /// Leave boot code for the schedule.
    ///
    /// Masks interrupts, programs exception priorities, binds `ticks` to
    /// [`on_tick`](Kernel::on_tick) at the configured rate, resets the
    /// critical nesting to zero, lets the scheduler core pick the first
    /// task and launches it. On hardware this never returns.
    ///
    /// On error interrupts stay masked and no task has run, except for
    /// [`ConfigError::AlreadyStarted`] which changes nothing.
    pub fn start_scheduler<T: TickSource>(&'static self, ticks: &mut T) -> Result<P::Never, ConfigError> {
        if self.is_started() {
            return Err(ConfigError::AlreadyStarted);
        }
        self.platform.disable_interrupts();

        if !self.core.has_runnable_task() {
            port_log!(error, "no runnable task at scheduler start");
            return Err(ConfigError::NoRunnableTask);
        }

        self.platform.set_exception_priorities(SWITCH_PRIORITY, TICK_PRIORITY);

        let ctx = self as *const Self as *mut ();
        if let Err(e) = ticks
            .bind_periodic_source(self.config.tick_hz, Self::tick_trampoline, ctx)
            .and_then(|()| ticks.start())
        {
            port_log!(error, "tick source failed: {}", e);
            return Err(e.into());
        }

        self.nesting.store(0, Ordering::Relaxed);
        self.select_next();
        self.started.store(true, Ordering::Release);
        port_log!(
            info,
            "scheduler started, {} Hz tick, preemption {}",
            self.config.tick_hz,
            self.config.preemption
        );

        Ok(unsafe { self.platform.launch_first_task(self) })
    }

    /// Stopping the schedule is not supported: mask interrupts and park
    /// the core.
    pub fn end_scheduler(&self) -> ! {
        self.platform.halt()
    }
}
