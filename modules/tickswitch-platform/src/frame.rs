//! Saved register frame contract
//!
//! A suspended task is described by one [`ContextFrame`] sitting at the
//! task's saved stack pointer. The frame has two halves, lowest address
//! first:
//!
//! | offset (words) | half              | registers                        |
//! |----------------|-------------------|----------------------------------|
//! | 0..8           | manually saved    | r4 r5 r6 r7 r8 r9 r10 r11        |
//! | 8..16          | hardware saved    | r0 r1 r2 r3 r12 lr pc xpsr       |
//!
//! The hardware half is what exception entry pushes and exception return
//! pops. The manually-saved half is written by the switch trap below it.
//! [`init_task_stack`], the trap vectors and the host model all use this
//! exact order; a mismatch hands a resumed task someone else's registers.

use core::ffi::c_void;
use core::mem::{offset_of, size_of};

use crate::StackWord;

/// Entry point of a task. Receives its parameter as the first argument.
pub type TaskEntry = extern "C" fn(*mut c_void);

/// Initial status word: Thumb state, base thread mode, nothing masked.
pub const INITIAL_XPSR: StackWord = 0x0100_0000;

/// Registers the switch trap saves itself.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoftwareFrame {
    pub r4: StackWord,
    pub r5: StackWord,
    pub r6: StackWord,
    pub r7: StackWord,
    pub r8: StackWord,
    pub r9: StackWord,
    pub r10: StackWord,
    pub r11: StackWord,
}

/// Registers exception entry stacks automatically.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardwareFrame {
    pub r0: StackWord,
    pub r1: StackWord,
    pub r2: StackWord,
    pub r3: StackWord,
    pub r12: StackWord,
    pub lr: StackWord,
    pub pc: StackWord,
    pub xpsr: StackWord,
}

/// Complete image of a suspended task.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextFrame {
    pub software: SoftwareFrame,
    pub hardware: HardwareFrame,
}

/// Words in the manually-saved half
pub const SOFTWARE_FRAME_WORDS: usize = size_of::<SoftwareFrame>() / size_of::<StackWord>();
/// Words in the hardware-saved half
pub const HARDWARE_FRAME_WORDS: usize = size_of::<HardwareFrame>() / size_of::<StackWord>();
/// Words in a whole frame
pub const CONTEXT_FRAME_WORDS: usize = SOFTWARE_FRAME_WORDS + HARDWARE_FRAME_WORDS;

const _: () = {
    assert!(SOFTWARE_FRAME_WORDS == 8);
    assert!(HARDWARE_FRAME_WORDS == 8);
    assert!(offset_of!(ContextFrame, hardware) == SOFTWARE_FRAME_WORDS * size_of::<StackWord>());
    assert!(offset_of!(HardwareFrame, r0) == 0);
    assert!(offset_of!(HardwareFrame, pc) == 6 * size_of::<StackWord>());
    assert!(offset_of!(HardwareFrame, xpsr) == 7 * size_of::<StackWord>());
};

/// Highest usable slot of `stack`, rounded down to an 8-byte boundary as
/// exception entry expects.
pub fn stack_top(stack: &mut [StackWord]) -> *mut StackWord {
    let range = stack.as_mut_ptr_range();
    let last = range.end.wrapping_sub(1) as usize;
    (last & !0x7) as *mut StackWord
}

/// Build the initial frame of a task that has never run.
///
/// Restoring from the returned address resumes at `entry` with `param` in
/// the first argument register, as if the task had been preempted right
/// before its first instruction. Slots are filled from `top` downwards:
///
/// 1. one padding word
/// 2. the status word, [`INITIAL_XPSR`]
/// 3. `entry` as the resume address
/// 4. the hardware-saved half: the exit trap in lr, `param` in r0
/// 5. the manually-saved half, left as placeholders
///
/// # Safety
/// `top` must point at the highest word of a writable region holding at
/// least [`CONTEXT_FRAME_WORDS`] + 1 words below and including it. The
/// size of the region is not checked.
pub unsafe fn init_task_stack(top: *mut StackWord, entry: TaskEntry, param: *mut c_void) -> *mut StackWord {
    port_log!(trace, "init_task_stack");
    unsafe {
        let hardware = top.sub(HARDWARE_FRAME_WORDS).cast::<HardwareFrame>();
        (&raw mut (*hardware).xpsr).write(INITIAL_XPSR);
        (&raw mut (*hardware).pc).write(entry as StackWord);
        (&raw mut (*hardware).lr).write(task_exit_trap as StackWord);
        // r12, r3, r2 and r1 are placeholders
        (&raw mut (*hardware).r0).write(param as StackWord);

        // r11..r4 are placeholders
        hardware.cast::<StackWord>().sub(SOFTWARE_FRAME_WORDS)
    }
}

/// Address an initial frame puts in lr: where a task lands if its entry
/// function returns.
pub fn task_exit_address() -> StackWord {
    task_exit_trap as StackWord
}

/// A task entry function returned. Tasks must never do so.
extern "C" fn task_exit_trap() -> ! {
    panic!("task entry function returned");
}
