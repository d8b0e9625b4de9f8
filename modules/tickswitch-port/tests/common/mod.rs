#![allow(dead_code)]

use std::ffi::c_void;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use tickswitch_platform::sim::{SimPlatform, SimTimer};
use tickswitch_platform::frame::stack_top;
use tickswitch_port::{Config, Kernel, Platform, SchedulerCore, StackWord, TaskControlBlock, TaskEntry, TaskHeader, TaskRef};

pub const STACK_WORDS: usize = 256;
pub const CORE_CLOCK_HZ: u32 = 48_000_000;

#[repr(C)]
pub struct TestTask {
    header: TaskHeader,
    pub entry: TaskEntry,
    pub param: usize,
    pub stack_top: *mut StackWord,
}

unsafe impl Sync for TestTask {}

unsafe impl TaskControlBlock for TestTask {
    fn header(&self) -> &TaskHeader {
        &self.header
    }
}

impl TestTask {
    pub fn task_ref(&'static self) -> TaskRef {
        TaskRef::new(self)
    }

    pub fn saved_stack_pointer(&self) -> *mut StackWord {
        self.header.saved_stack_pointer()
    }
}

/// A never-run task with its own leaked stack.
pub fn spawn(entry: TaskEntry, param: usize) -> &'static TestTask {
    let stack: &'static mut [StackWord] = Box::leak(vec![0; STACK_WORDS].into_boxed_slice());
    let top = stack_top(stack);
    let task: &'static TestTask = Box::leak(Box::new(TestTask {
        header: TaskHeader::new(),
        entry,
        param,
        stack_top: top,
    }));
    unsafe { task.header.prepare(stack, entry, param as *mut c_void) };
    task
}

/// Round-robin over a fixed task list, recording how it was called.
pub struct RoundRobin {
    platform: &'static SimPlatform,
    tasks: Vec<TaskRef>,
    cursor: AtomicUsize,
    ticks: AtomicU64,
    advanced_unmasked: AtomicBool,
    selected_unmasked: AtomicBool,
    selections: Mutex<Vec<TaskRef>>,
}

impl RoundRobin {
    pub fn new(platform: &'static SimPlatform, tasks: &[&'static TestTask]) -> Self {
        Self {
            platform,
            tasks: tasks.iter().map(|task| task.task_ref()).collect(),
            cursor: AtomicUsize::new(0),
            ticks: AtomicU64::new(0),
            advanced_unmasked: AtomicBool::new(false),
            selected_unmasked: AtomicBool::new(false),
            selections: Mutex::new(Vec::new()),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Whether any call ran with interrupts unmasked.
    pub fn ran_unmasked(&self) -> bool {
        self.advanced_unmasked.load(Ordering::Acquire) || self.selected_unmasked.load(Ordering::Acquire)
    }

    pub fn selections(&self) -> Vec<TaskRef> {
        self.selections.lock().unwrap().clone()
    }
}

impl SchedulerCore for RoundRobin {
    fn advance_tick(&self) {
        if !self.platform.interrupts_masked() {
            self.advanced_unmasked.store(true, Ordering::Release);
        }
        self.ticks.fetch_add(1, Ordering::AcqRel);
    }

    fn select_next_task(&self) -> TaskRef {
        if !self.platform.interrupts_masked() {
            self.selected_unmasked.store(true, Ordering::Release);
        }
        let index = self.cursor.fetch_add(1, Ordering::AcqRel);
        let next = self.tasks[index % self.tasks.len()];
        self.selections.lock().unwrap().push(next);
        next
    }

    fn has_runnable_task(&self) -> bool {
        !self.tasks.is_empty()
    }
}

pub type TestKernel = Kernel<&'static SimPlatform, RoundRobin>;

pub struct Harness {
    pub platform: &'static SimPlatform,
    pub kernel: &'static TestKernel,
    pub timer: SimTimer,
}

impl Harness {
    pub fn new(tasks: &[&'static TestTask], config: Config) -> Self {
        let platform: &'static SimPlatform = Box::leak(Box::new(SimPlatform::new()));
        let kernel: &'static TestKernel = Box::leak(Box::new(Kernel::new(
            platform,
            RoundRobin::new(platform, tasks),
            config.with_core_clock(CORE_CLOCK_HZ),
        )));
        Self {
            platform,
            kernel,
            timer: SimTimer::new(platform, CORE_CLOCK_HZ),
        }
    }

    /// Start with `tasks` in round-robin order; the first one runs.
    pub fn started(tasks: &[&'static TestTask], config: Config) -> Self {
        let mut harness = Self::new(tasks, config);
        harness.kernel.start_scheduler(&mut harness.timer).unwrap();
        harness
    }

    pub fn core(&self) -> &RoundRobin {
        self.kernel.core()
    }

    pub fn running(&self, task: &'static TestTask) -> bool {
        self.kernel.current_task() == Some(task.task_ref())
    }
}
