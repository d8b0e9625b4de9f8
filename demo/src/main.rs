#![no_std]
#![no_main]

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};

use tickswitch_demo::{CORE_CLOCK_HZ, RoundRobin, Task};
use tickswitch_platform::arm::{CortexM0, SysTickSource};
use tickswitch_port::{Config, Kernel};

static TASK_A: Task = Task::new();
static TASK_B: Task = Task::new();

static KERNEL: Kernel<CortexM0, RoundRobin<2>> = Kernel::new(
    CortexM0,
    RoundRobin::new([&TASK_A, &TASK_B]),
    Config::DEFAULT.with_core_clock(CORE_CLOCK_HZ),
);

static COUNTS: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];

#[cortex_m_rt::entry]
fn main() -> ! {
    unsafe {
        TASK_A.prepare(counter, 0 as *mut c_void);
        TASK_B.prepare(counter, 1 as *mut c_void);
    }

    let config = KERNEL.config();
    defmt::info!("two tasks, {} Hz tick on a {} Hz core", config.tick_hz, config.core_clock_hz);

    let mut systick = SysTickSource::take(config.core_clock_hz);
    match KERNEL.start_scheduler(&mut systick) {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("scheduler did not start: {}", e),
    }
}

/// Count forever; every 100k the task reports and yields.
extern "C" fn counter(param: *mut c_void) {
    let index = param as usize;
    loop {
        let count = {
            let _cs = KERNEL.critical();
            let count = COUNTS[index].load(Ordering::Relaxed) + 1;
            COUNTS[index].store(count, Ordering::Relaxed);
            count
        };
        if count % 100_000 == 0 {
            defmt::info!(
                "task {} at {}, {} ticks, {} switches",
                index,
                count,
                KERNEL.core().ticks(),
                KERNEL.switch_count()
            );
            KERNEL.yield_now();
        }
    }
}
