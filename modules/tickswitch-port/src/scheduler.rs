use crate::TaskRef;

/// Task-selection policy this layer switches on behalf of
///
/// Every method is called with interrupts masked.
pub trait SchedulerCore: Sync {
    /// One tick period elapsed.
    fn advance_tick(&self);

    /// The task to run next. May return the task that was running.
    fn select_next_task(&self) -> TaskRef;

    /// Whether [`SchedulerCore::select_next_task`] has anything to return.
    fn has_runnable_task(&self) -> bool;
}
