//! Register file and exception stacking

use crate::StackWord;
use crate::frame::{HARDWARE_FRAME_WORDS, HardwareFrame, INITIAL_XPSR, SOFTWARE_FRAME_WORDS, SoftwareFrame};

/// Value left in registers a handler is free to clobber.
pub const CLOBBER: StackWord = 0xDEAD_BEEF;

/// lr inside a handler entered from a task: return to thread mode on the
/// process stack.
pub const EXC_RETURN_THREAD_PSP: StackWord = 0xFFFF_FFFD;

/// lr inside a handler entered before the first task runs: return to thread
/// mode on the main stack.
pub const EXC_RETURN_THREAD_MSP: StackWord = 0xFFFF_FFF9;

/// Registers visible to a task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    /// r0 to r12
    pub r: [StackWord; 13],
    pub lr: StackWord,
    pub pc: StackWord,
    pub xpsr: StackWord,
}

impl Registers {
    /// Every register holds a value distinct from every other register and
    /// from any other seed.
    pub fn pattern(seed: StackWord) -> Self {
        let mut r = [0; 13];
        for (index, reg) in r.iter_mut().enumerate() {
            *reg = (seed << 8) | index as StackWord;
        }
        Self {
            r,
            lr: (seed << 8) | 0x0E,
            pc: (seed << 8) | 0x0F,
            // condition flags vary, the thumb bit stays
            xpsr: INITIAL_XPSR | ((seed & 0xF) << 28),
        }
    }

    /// First argument register
    pub fn r0(&self) -> StackWord {
        self.r[0]
    }
}

pub(crate) struct Cpu {
    pub(crate) regs: Registers,
    pub(crate) psp: *mut StackWord,
    pub(crate) msp: StackWord,
    /// Thread mode runs on the process stack. Until then exception entry
    /// stacks onto the main stack, which the model keeps in `main_frame`.
    pub(crate) on_process_stack: bool,
    main_frame: Option<HardwareFrame>,
}

// Only reachable through the platform's lock.
unsafe impl Send for Cpu {}

impl Cpu {
    pub(crate) const fn new() -> Self {
        Self {
            regs: Registers {
                r: [0; 13],
                lr: 0,
                pc: 0,
                xpsr: 0,
            },
            psp: core::ptr::null_mut(),
            msp: 0,
            on_process_stack: false,
            main_frame: None,
        }
    }

    /// Exception entry: stack r0-r3, r12, lr, pc and xpsr on the stack
    /// thread mode is using.
    pub(crate) unsafe fn stack_hardware_frame(&mut self) {
        let regs = &self.regs;
        let frame = HardwareFrame {
            r0: regs.r[0],
            r1: regs.r[1],
            r2: regs.r[2],
            r3: regs.r[3],
            r12: regs.r[12],
            lr: regs.lr,
            pc: regs.pc,
            xpsr: regs.xpsr,
        };
        if self.on_process_stack {
            unsafe {
                self.psp = self.psp.sub(HARDWARE_FRAME_WORDS);
                self.psp.cast::<HardwareFrame>().write(frame);
            }
            self.regs.lr = EXC_RETURN_THREAD_PSP;
        } else {
            self.main_frame = Some(frame);
            self.regs.lr = EXC_RETURN_THREAD_MSP;
        }
        for reg in [0, 1, 2, 3, 12] {
            self.regs.r[reg] = CLOBBER;
        }
    }

    /// Exception return: pop the hardware half off the stack `lr` selects.
    pub(crate) unsafe fn unstack_hardware_frame(&mut self) {
        self.on_process_stack = self.regs.lr == EXC_RETURN_THREAD_PSP;
        let frame = if self.on_process_stack {
            let frame = unsafe { self.psp.cast::<HardwareFrame>().read() };
            self.psp = unsafe { self.psp.add(HARDWARE_FRAME_WORDS) };
            frame
        } else {
            self.main_frame.take().unwrap_or_default()
        };
        let regs = &mut self.regs;
        regs.r[0] = frame.r0;
        regs.r[1] = frame.r1;
        regs.r[2] = frame.r2;
        regs.r[3] = frame.r3;
        regs.r[12] = frame.r12;
        regs.lr = frame.lr;
        regs.pc = frame.pc;
        regs.xpsr = frame.xpsr;
    }

    /// Write r4-r11 right below the process stack pointer and return where.
    /// The process stack pointer itself is not moved.
    pub(crate) unsafe fn save_software_frame(&mut self) -> *mut StackWord {
        let regs = &self.regs;
        let frame = SoftwareFrame {
            r4: regs.r[4],
            r5: regs.r[5],
            r6: regs.r[6],
            r7: regs.r[7],
            r8: regs.r[8],
            r9: regs.r[9],
            r10: regs.r[10],
            r11: regs.r[11],
        };
        let base = unsafe { self.psp.sub(SOFTWARE_FRAME_WORDS) };
        unsafe { base.cast::<SoftwareFrame>().write(frame) };
        // the trap reuses r4-r7 as scratch while moving r8-r11
        for reg in 4..12 {
            self.regs.r[reg] = CLOBBER;
        }
        base
    }

    /// Load r4-r11 from `frame` and leave the process stack pointer at the
    /// hardware half above it.
    pub(crate) unsafe fn restore_software_frame(&mut self, frame: *mut StackWord) {
        let saved = unsafe { frame.cast::<SoftwareFrame>().read() };
        let regs = &mut self.regs;
        regs.r[4] = saved.r4;
        regs.r[5] = saved.r5;
        regs.r[6] = saved.r6;
        regs.r[7] = saved.r7;
        regs.r[8] = saved.r8;
        regs.r[9] = saved.r9;
        regs.r[10] = saved.r10;
        regs.r[11] = saved.r11;
        self.psp = unsafe { frame.add(SOFTWARE_FRAME_WORDS) };
    }
}
