use std::ffi::c_void;

use tickswitch_cfg::{SWITCH_PRIORITY, TICK_PRIORITY};
use tickswitch_platform::sim::{MAIN_STACK_TOP, SimTimer};
use tickswitch_port::{Config, ConfigError, Platform, StackWord, TickSource, TimerError};

mod common;
use common::{CORE_CLOCK_HZ, Harness, spawn};

extern "C" fn task(_: *mut c_void) {}

/// Timer whose first period runs out while start still has interrupts
/// masked.
struct ExpiresDuringStart(SimTimer);

impl TickSource for ExpiresDuringStart {
    fn bind_periodic_source(&mut self, frequency_hz: u32, on_tick: fn(*mut ()), ctx: *mut ()) -> Result<(), TimerError> {
        self.0.bind_periodic_source(frequency_hz, on_tick, ctx)
    }

    fn start(&mut self) -> Result<(), TimerError> {
        self.0.start()?;
        self.0.fire();
        Ok(())
    }
}

fn assert_not_launched(h: &Harness) {
    assert!(h.platform.interrupts_masked());
    assert!(!h.platform.launched());
    assert!(!h.kernel.is_started());
    assert_eq!(h.kernel.current_task(), None);
}

#[test]
fn missing_timer_is_reported() {
    let h = Harness::new(&[spawn(task, 0)], Config::DEFAULT);
    let mut missing = SimTimer::missing(h.platform);
    assert_eq!(h.kernel.start_scheduler(&mut missing), Err(ConfigError::NoTickSource));
    assert_not_launched(&h);
}

#[test]
fn rejected_rate_is_reported() {
    let mut h = Harness::new(&[spawn(task, 0)], Config::DEFAULT.with_tick_hz(0));
    assert_eq!(
        h.kernel.start_scheduler(&mut h.timer),
        Err(ConfigError::TickSourceRejected(TimerError::InvalidFrequency))
    );
    assert!(!h.timer.running());
    assert_not_launched(&h);
}

#[test]
fn empty_core_is_reported() {
    let mut h = Harness::new(&[], Config::DEFAULT);
    assert_eq!(h.kernel.start_scheduler(&mut h.timer), Err(ConfigError::NoRunnableTask));
    assert!(!h.timer.running());
    assert_not_launched(&h);
}

#[test]
fn second_start_is_refused() {
    let mut h = Harness::started(&[spawn(task, 0)], Config::DEFAULT);
    assert_eq!(h.kernel.start_scheduler(&mut h.timer), Err(ConfigError::AlreadyStarted));
    assert!(!h.platform.interrupts_masked());
}

#[test]
fn start_programs_the_exception_model() {
    let h = Harness::started(&[spawn(task, 0)], Config::DEFAULT);
    assert_eq!(h.platform.exception_priorities(), Some((SWITCH_PRIORITY, TICK_PRIORITY)));
    assert_eq!(h.platform.main_stack_pointer(), MAIN_STACK_TOP);
    assert!(h.platform.launched());
    assert!(h.kernel.is_started());
    assert_eq!(h.kernel.critical_nesting(), 0);
}

#[test]
fn tick_expiring_before_launch_leaves_every_task_intact() {
    let a = spawn(task, 0xA);
    let b = spawn(task, 0xB);
    let (frame_a, frame_b) = (a.saved_stack_pointer(), b.saved_stack_pointer());
    let h = Harness::new(&[a, b], Config::DEFAULT);
    let mut timer = ExpiresDuringStart(SimTimer::new(h.platform, CORE_CLOCK_HZ));
    h.kernel.start_scheduler(&mut timer).unwrap();

    // tick and switch are taken at the unmask, ahead of the launching trap
    assert_eq!(h.core().ticks(), 1);
    assert_eq!(h.platform.switches_taken(), 1);
    assert_eq!(h.kernel.switch_count(), 0);
    assert_eq!(h.core().selections(), vec![a.task_ref()]);

    // the boot registers went nowhere near a control block
    assert_eq!(a.saved_stack_pointer(), frame_a);
    assert_eq!(b.saved_stack_pointer(), frame_b);

    assert!(h.running(a));
    let regs = h.platform.registers();
    assert_eq!(regs.r0(), 0xA);
    assert_eq!(regs.pc, task as StackWord);
    assert_eq!(h.platform.process_stack_pointer(), a.stack_top);
    assert_eq!(h.platform.main_stack_pointer(), MAIN_STACK_TOP);

    // from here on switches save and restore as usual
    timer.0.fire();
    assert!(h.running(b));
    assert_eq!(h.kernel.switch_count(), 1);
    assert_eq!(h.platform.registers().r0(), 0xB);
}

#[test]
#[should_panic(expected = "core halted")]
fn end_scheduler_halts() {
    let h = Harness::started(&[spawn(task, 0)], Config::DEFAULT);
    h.kernel.end_scheduler();
}
