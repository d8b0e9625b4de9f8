use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, AtomicU32, AtomicUsize, Ordering};

use tickswitch_cfg::Config;
use tickswitch_platform::Platform;

use crate::task::{TaskHeader, TaskRef};
use crate::SchedulerCore;

/// Nesting depth before the scheduler starts. Critical sections entered
/// during boot never bring it back to zero, so they leave interrupts
/// masked until the first task is launched.
pub(crate) const NESTING_BEFORE_START: usize = 0xAAAA_AAAA;

/// The process-wide state of the layer
///
/// The target has no atomic read-modify-write, so every counter here is
/// updated with a load and a store while interrupts are masked.
pub struct Kernel<P: Platform, S: SchedulerCore> {
    pub(crate) platform: P,
    pub(crate) core: S,
    pub(crate) config: Config,
    pub(crate) nesting: AtomicUsize,
    pub(crate) current: AtomicPtr<TaskHeader>,
    pub(crate) started: AtomicBool,
    /// Set by the launching trap once the first task's frame is restored
    pub(crate) launched: AtomicBool,
    pub(crate) switches: AtomicU32,
}

impl<P: Platform, S: SchedulerCore> Kernel<P, S> {
    pub const fn new(platform: P, core: S, config: Config) -> Self {
        Self {
            platform,
            core,
            config,
            nesting: AtomicUsize::new(NESTING_BEFORE_START),
            current: AtomicPtr::new(ptr::null_mut()),
            started: AtomicBool::new(false),
            launched: AtomicBool::new(false),
            switches: AtomicU32::new(0),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn core(&self) -> &S {
        &self.core
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// The running task, once the scheduler has selected one.
    pub fn current_task(&self) -> Option<TaskRef> {
        TaskRef::from_ptr(self.current.load(Ordering::Acquire))
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Whether the caller runs in an exception handler.
    pub fn in_interrupt(&self) -> bool {
        self.platform.in_interrupt()
    }

    /// Deferred switches completed since start.
    pub fn switch_count(&self) -> u32 {
        self.switches.load(Ordering::Acquire)
    }
}
