#![no_std]

//! Board support shared by the demo firmware and its on-target tests: a
//! statically allocated task type and a round-robin scheduler core.

use core::cell::UnsafeCell;
use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use defmt_rtt as _;
use panic_probe as _;
use tickswitch_port::{SchedulerCore, StackWord, TaskControlBlock, TaskEntry, TaskHeader, TaskRef};

/// HSI, no PLL
pub const CORE_CLOCK_HZ: u32 = 8_000_000;

pub const STACK_WORDS: usize = 256;

/// A task with its stack
#[repr(C)]
pub struct Task {
    header: TaskHeader,
    stack: UnsafeCell<[StackWord; STACK_WORDS]>,
}

// The stack is only touched by `prepare` before start, then by the task.
unsafe impl Sync for Task {}

unsafe impl TaskControlBlock for Task {
    fn header(&self) -> &TaskHeader {
        &self.header
    }
}

impl Task {
    pub const fn new() -> Self {
        Self {
            header: TaskHeader::new(),
            stack: UnsafeCell::new([0; STACK_WORDS]),
        }
    }

    /// # Safety
    /// Before the scheduler starts, once per task.
    pub unsafe fn prepare(&'static self, entry: TaskEntry, param: *mut c_void) {
        let stack = unsafe { &mut *self.stack.get() };
        unsafe { self.header.prepare(stack, entry, param) };
    }
}

/// Every task in turn, one per switch
pub struct RoundRobin<const N: usize> {
    tasks: [&'static Task; N],
    cursor: AtomicUsize,
    ticks: AtomicU32,
}

impl<const N: usize> RoundRobin<N> {
    pub const fn new(tasks: [&'static Task; N]) -> Self {
        Self {
            tasks,
            cursor: AtomicUsize::new(0),
            ticks: AtomicU32::new(0),
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

// Called masked; armv6-m has no atomic read-modify-write.
impl<const N: usize> SchedulerCore for RoundRobin<N> {
    fn advance_tick(&self) {
        let ticks = self.ticks.load(Ordering::Relaxed);
        self.ticks.store(ticks.wrapping_add(1), Ordering::Relaxed);
    }

    fn select_next_task(&self) -> TaskRef {
        let index = self.cursor.load(Ordering::Relaxed);
        self.cursor.store((index + 1) % N, Ordering::Relaxed);
        TaskRef::new(self.tasks[index])
    }

    fn has_runnable_task(&self) -> bool {
        N > 0
    }
}

/// Leave the semihosting session with the given status.
pub fn exit(success: bool) -> ! {
    use cortex_m_semihosting::debug;
    loop {
        debug::exit(if success { debug::EXIT_SUCCESS } else { debug::EXIT_FAILURE });
    }
}
