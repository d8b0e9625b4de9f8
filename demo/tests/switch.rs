#![no_std]
#![no_main]

//! On-target checks of the Cortex-M0 port
//!
//! The last test launches the scheduler and never returns: a task ends the
//! session once both tasks have run through a number of tick periods.

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};

use tickswitch_demo::{CORE_CLOCK_HZ, RoundRobin, Task};
use tickswitch_platform::arm::CortexM0;
use tickswitch_port::{Config, Kernel};

static TASK_A: Task = Task::new();
static TASK_B: Task = Task::new();

static KERNEL: Kernel<CortexM0, RoundRobin<2>> = Kernel::new(
    CortexM0,
    RoundRobin::new([&TASK_A, &TASK_B]),
    Config::DEFAULT.with_core_clock(CORE_CLOCK_HZ),
);

static RUNS: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];

const ROUNDS: u32 = 20;

extern "C" fn spinner(param: *mut c_void) {
    let index = param as usize;
    let mut last_tick = KERNEL.core().ticks();
    loop {
        // count the tick periods this task got to run in
        let tick = KERNEL.core().ticks();
        if tick != last_tick {
            last_tick = tick;
            let _cs = KERNEL.critical();
            RUNS[index].store(RUNS[index].load(Ordering::Relaxed) + 1, Ordering::Relaxed);
        }
        if index == 0 && RUNS.iter().all(|runs| runs.load(Ordering::Relaxed) >= ROUNDS) {
            defmt::info!("{} switches", KERNEL.switch_count());
            tickswitch_demo::exit(KERNEL.switch_count() >= 2 * ROUNDS);
        }
    }
}

#[defmt_test::tests]
mod tests {
    use core::ffi::c_void;

    use defmt::assert_eq;
    use tickswitch_platform::frame::{INITIAL_XPSR, init_task_stack, stack_top};
    use tickswitch_platform::{Platform, StackWord};

    use super::{KERNEL, TASK_A, TASK_B, spinner};
    use tickswitch_demo::CORE_CLOCK_HZ;
    use tickswitch_platform::arm::SysTickSource;

    extern "C" fn entry(_: *mut c_void) {}

    #[test]
    fn initial_frame_matches_the_exception_frame() {
        let mut stack = [0 as StackWord; 32];
        let top = stack_top(&mut stack);
        let sp = unsafe { init_task_stack(top, entry, 0x1234 as *mut c_void) };
        let words = unsafe { core::slice::from_raw_parts(sp, 16) };
        assert_eq!(words[8], 0x1234);
        assert_eq!(words[14], entry as StackWord);
        assert_eq!(words[15], INITIAL_XPSR);
    }

    #[test]
    fn boot_critical_sections_stay_masked() {
        KERNEL.enter_critical();
        KERNEL.exit_critical();
        defmt::assert!(KERNEL.platform().interrupts_masked());
        defmt::assert!(!KERNEL.in_interrupt());
    }

    #[test]
    fn tasks_preempt_each_other() {
        unsafe {
            TASK_A.prepare(spinner, 0 as *mut c_void);
            TASK_B.prepare(spinner, 1 as *mut c_void);
        }
        let mut systick = SysTickSource::take(CORE_CLOCK_HZ);
        match KERNEL.start_scheduler(&mut systick) {
            Ok(never) => match never {},
            Err(e) => defmt::panic!("scheduler did not start: {}", e),
        }
    }
}
