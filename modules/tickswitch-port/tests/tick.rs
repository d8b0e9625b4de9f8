use std::ffi::c_void;

use tickswitch_port::{Clock, Config, Timeout, wait_until};

mod common;
use common::{CORE_CLOCK_HZ, Harness, spawn};

extern "C" fn task_a(_: *mut c_void) {}
extern "C" fn task_b(_: *mut c_void) {}

#[test]
fn every_tick_advances_once_and_switches_once() {
    let a = spawn(task_a, 1);
    let b = spawn(task_b, 2);
    let h = Harness::started(&[a, b], Config::DEFAULT);

    for n in 1..=5u64 {
        h.timer.fire();
        assert_eq!(h.core().ticks(), n);
        assert_eq!(h.kernel.switch_count() as u64, n);
    }
    assert!(h.running(b));
    assert!(!h.core().ran_unmasked());
}

#[test]
fn cooperative_ticks_never_switch() {
    let a = spawn(task_a, 1);
    let b = spawn(task_b, 2);
    let h = Harness::started(&[a, b], Config::DEFAULT.cooperative());

    h.timer.fire();
    h.timer.fire();
    assert_eq!(h.core().ticks(), 2);
    assert_eq!(h.kernel.switch_count(), 0);
    assert!(!h.platform.switch_pending());
    assert!(h.running(a));
}

#[test]
fn tick_inside_a_critical_section_waits() {
    let a = spawn(task_a, 1);
    let b = spawn(task_b, 2);
    let h = Harness::started(&[a, b], Config::DEFAULT);

    h.kernel.enter_critical();
    h.timer.fire();
    h.timer.fire();
    assert_eq!(h.core().ticks(), 0);

    h.kernel.exit_critical();
    assert_eq!(h.core().ticks(), 1, "pended ticks coalesce");
    assert_eq!(h.kernel.switch_count(), 1);
    assert!(h.running(b));
}

#[test]
fn tick_source_is_programmed_for_the_configured_rate() {
    let a = spawn(task_a, 1);
    let h = Harness::started(&[a], Config::DEFAULT.with_tick_hz(100));
    let config = h.kernel.config();
    assert_eq!(config.tick_hz, 100);
    assert_eq!(config.core_clock_hz, CORE_CLOCK_HZ);
    assert!(h.timer.running());
    assert_eq!(h.timer.reload(), Some(config.core_clock_hz / config.tick_hz - 1));
}

#[test]
fn tick_from_a_handler_switches_after_it() {
    let a = spawn(task_a, 1);
    let b = spawn(task_b, 2);
    let h = Harness::started(&[a, b], Config::DEFAULT);

    // the switch waits for the handler to return
    h.platform.interrupt(|| {
        h.kernel.on_tick();
        assert_eq!(h.kernel.switch_count(), 0);
    });
    assert_eq!(h.core().ticks(), 1);
    assert_eq!(h.kernel.switch_count(), 1);
}

#[test]
fn wait_until_against_the_tick_clock() {
    let a = spawn(task_a, 1);
    let h = Harness::started(&[a], Config::DEFAULT.cooperative());

    let mut polls = 0;
    let ready = wait_until(&h.timer, 10, || {
        polls += 1;
        h.timer.fire();
        polls == 4
    });
    assert_eq!(ready, Ok(()));

    let start = h.timer.now();
    let stuck = wait_until(&h.timer, 10, || {
        h.timer.fire();
        false
    });
    assert_eq!(stuck, Err(Timeout));
    assert!(h.timer.now() - start >= 10);
}
