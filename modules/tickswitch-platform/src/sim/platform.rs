//! Host platform

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};

use spin::{Mutex, Once};

use super::cpu::{Cpu, EXC_RETURN_THREAD_PSP, Registers};
use crate::StackWord;
use crate::frame::SOFTWARE_FRAME_WORDS;
use crate::traits::{Platform, TickCallback, TrapHandler};

/// Value the first-task launch loads into the main stack pointer, standing
/// in for the initial stack pointer of the vector table.
pub const MAIN_STACK_TOP: StackWord = 0x2000_2000;

#[derive(Clone, Copy)]
struct TickBinding {
    callback: TickCallback,
    ctx: *mut (),
}

// The context pointer is only handed back to the callback it was bound with.
unsafe impl Send for TickBinding {}

/// Host model of a single-core ARMv6-M exception model
///
/// Pending exceptions are taken at the points where the core would take
/// them: when interrupts get unmasked, after a barrier, and when the last
/// active handler returns. A deferred switch armed from thread mode is
/// taken by the next of these, which for [`Platform::synchronize`] is
/// immediate. The window between unmasking and the supervisor call of
/// [`Platform::launch_first_task`] is one of these points too.
pub struct SimPlatform {
    primask: AtomicBool,
    switch_pending: AtomicBool,
    tick_pending: AtomicBool,
    depth: AtomicUsize,
    launched: AtomicBool,
    ticks: AtomicU64,
    switches_taken: AtomicU32,
    handler: Once<&'static dyn TrapHandler>,
    tick: Mutex<Option<TickBinding>>,
    priorities: Mutex<Option<(u8, u8)>>,
    cpu: Mutex<Cpu>,
    /// Process stack of the boot code, for a switch taken before launch
    scratch: [AtomicUsize; SOFTWARE_FRAME_WORDS],
}

impl SimPlatform {
    /// Core out of reset: thread mode, interrupts unmasked, nothing pending.
    pub const fn new() -> Self {
        Self {
            primask: AtomicBool::new(false),
            switch_pending: AtomicBool::new(false),
            tick_pending: AtomicBool::new(false),
            depth: AtomicUsize::new(0),
            launched: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            switches_taken: AtomicU32::new(0),
            handler: Once::new(),
            tick: Mutex::new(None),
            priorities: Mutex::new(None),
            cpu: Mutex::new(Cpu::new()),
            scratch: [const { AtomicUsize::new(0) }; SOFTWARE_FRAME_WORDS],
        }
    }

    /// Register file of the running task
    pub fn registers(&self) -> Registers {
        self.cpu.lock().regs
    }

    /// Overwrite the register file, as the running task computing would.
    pub fn set_registers(&self, regs: Registers) {
        self.cpu.lock().regs = regs;
    }

    pub fn process_stack_pointer(&self) -> *mut StackWord {
        self.cpu.lock().psp
    }

    pub fn main_stack_pointer(&self) -> StackWord {
        self.cpu.lock().msp
    }

    /// Whether the first task has been restored.
    pub fn launched(&self) -> bool {
        self.launched.load(Ordering::Acquire)
    }

    pub fn switch_pending(&self) -> bool {
        self.switch_pending.load(Ordering::Acquire)
    }

    /// Deferred switches taken so far.
    pub fn switches_taken(&self) -> u32 {
        self.switches_taken.load(Ordering::Acquire)
    }

    /// `(switch, tick)` priorities programmed so far.
    pub fn exception_priorities(&self) -> Option<(u8, u8)> {
        *self.priorities.lock()
    }

    /// Run `f` as a peripheral interrupt handler. Exceptions it pends are
    /// taken when it returns.
    ///
    /// # Panics
    /// If interrupts are masked: a masked core does not take the
    /// interrupt.
    pub fn interrupt<R>(&self, f: impl FnOnce() -> R) -> R {
        assert!(!self.interrupts_masked(), "interrupt raised while masked");
        self.depth.fetch_add(1, Ordering::AcqRel);
        let ret = f();
        self.depth.fetch_sub(1, Ordering::AcqRel);
        self.service_pending();
        ret
    }

    pub(crate) fn raise_tick(&self) {
        self.tick_pending.store(true, Ordering::Release);
        self.service_pending();
    }

    pub(crate) fn bind_tick(&self, callback: TickCallback, ctx: *mut ()) {
        *self.tick.lock() = Some(TickBinding { callback, ctx });
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    fn service_pending(&self) {
        loop {
            if self.depth.load(Ordering::Acquire) > 0 || self.interrupts_masked() {
                return;
            }
            if self.tick_pending.swap(false, Ordering::AcqRel) {
                self.take_tick();
                continue;
            }
            if self.switch_pending.swap(false, Ordering::AcqRel) {
                self.take_switch();
                continue;
            }
            return;
        }
    }

    fn take_tick(&self) {
        let binding = *self.tick.lock();
        self.depth.fetch_add(1, Ordering::AcqRel);
        self.ticks.fetch_add(1, Ordering::AcqRel);
        if let Some(TickBinding { callback, ctx }) = binding {
            callback(ctx);
        }
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }

    fn take_switch(&self) {
        let Some(&handler) = self.handler.get() else {
            return;
        };
        self.depth.fetch_add(1, Ordering::AcqRel);
        let saved = {
            let mut cpu = self.cpu.lock();
            unsafe {
                cpu.stack_hardware_frame();
                cpu.save_software_frame()
            }
        };
        // the lock is released: the handler calls back into the platform
        let next = unsafe { handler.switch(saved) };
        {
            let mut cpu = self.cpu.lock();
            unsafe {
                cpu.restore_software_frame(next);
                cpu.unstack_hardware_frame();
            }
        }
        self.switches_taken.fetch_add(1, Ordering::AcqRel);
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for SimPlatform {
    /// Launching returns once the first task's registers are loaded.
    type Never = ();

    fn disable_interrupts(&self) {
        self.primask.store(true, Ordering::Release);
    }

    fn enable_interrupts(&self) {
        self.primask.store(false, Ordering::Release);
        self.service_pending();
    }

    fn interrupts_masked(&self) -> bool {
        self.primask.load(Ordering::Acquire)
    }

    fn mask_from_isr(&self) -> bool {
        self.primask.swap(true, Ordering::AcqRel)
    }

    fn unmask_from_isr(&self, was_masked: bool) {
        self.primask.store(was_masked, Ordering::Release);
        if !was_masked {
            self.service_pending();
        }
    }

    fn pend_switch(&self) {
        self.switch_pending.store(true, Ordering::Release);
    }

    fn synchronize(&self) {
        self.service_pending();
    }

    fn in_interrupt(&self) -> bool {
        self.depth.load(Ordering::Acquire) > 0
    }

    fn set_exception_priorities(&self, switch: u8, tick: u8) {
        *self.priorities.lock() = Some((switch, tick));
    }

    unsafe fn launch_first_task(&self, handler: &'static dyn TrapHandler) {
        self.handler.call_once(|| handler);
        {
            let mut cpu = self.cpu.lock();
            cpu.msp = MAIN_STACK_TOP;
            let scratch = self.scratch.as_ptr().cast::<StackWord>().cast_mut();
            cpu.psp = unsafe { scratch.add(SOFTWARE_FRAME_WORDS) };
        }
        self.primask.store(false, Ordering::Release);
        // anything pended while masked is taken before the supervisor call
        self.service_pending();

        // supervisor call
        self.depth.fetch_add(1, Ordering::AcqRel);
        let frame = unsafe { handler.first_task() };
        {
            let mut cpu = self.cpu.lock();
            unsafe {
                cpu.restore_software_frame(frame);
                cpu.regs.lr = EXC_RETURN_THREAD_PSP;
                cpu.unstack_hardware_frame();
            }
        }
        self.depth.fetch_sub(1, Ordering::AcqRel);
        self.launched.store(true, Ordering::Release);
        self.service_pending();
    }

    fn halt(&self) -> ! {
        self.primask.store(true, Ordering::Release);
        panic!("core halted");
    }
}
