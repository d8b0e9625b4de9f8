//! PendSV and SVCall glue
//!
//! Both vectors only move registers. PendSV writes the manually-saved half
//! below the process stack pointer, hands its address to
//! `__tickswitch_switch` and restores from whatever address comes back.
//! SVCall restores from `__tickswitch_first_task` and forces the return to
//! thread mode on the process stack. The frame layout is the one in
//! [`crate::frame`]; r4-r7 are stored first, then r8-r11 by way of r4-r7.
//!
//! A PendSV that tail-chains between unmasking and the launching `svc`
//! saves into [`boot_process_stack`] and returns to the boot code on the
//! main stack.

use core::arch::global_asm;
use core::cell::UnsafeCell;

use cortex_m::peripheral::SCB;
use cortex_m::peripheral::scb::{Exception, VectActive};

use crate::StackWord;
use crate::frame::SOFTWARE_FRAME_WORDS;
use crate::traits::TrapHandler;

struct HandlerSlot(UnsafeCell<Option<&'static dyn TrapHandler>>);

// Written once in thread mode with interrupts masked, before the first
// exception that reads it can be taken.
unsafe impl Sync for HandlerSlot {}

static HANDLER: HandlerSlot = HandlerSlot(UnsafeCell::new(None));

#[repr(C, align(8))]
struct BootScratch(UnsafeCell<[StackWord; SOFTWARE_FRAME_WORDS]>);

// Only written by PendSV, before any task runs.
unsafe impl Sync for BootScratch {}

static BOOT_SCRATCH: BootScratch = BootScratch(UnsafeCell::new([0; SOFTWARE_FRAME_WORDS]));

/// Process stack pointer for the boot code, with room for one software
/// frame below it.
pub(super) fn boot_process_stack() -> *mut StackWord {
    unsafe { BOOT_SCRATCH.0.get().cast::<StackWord>().add(SOFTWARE_FRAME_WORDS) }
}

/// # Safety
/// Interrupts must be masked and the scheduler not yet launched.
pub(super) unsafe fn install(handler: &'static dyn TrapHandler) {
    unsafe { *HANDLER.0.get() = Some(handler) };
}

fn installed(vector: Exception) -> &'static dyn TrapHandler {
    if SCB::vect_active() != VectActive::Exception(vector) {
        panic!("switch trap entered outside its exception vector");
    }
    match unsafe { *HANDLER.0.get() } {
        Some(handler) => handler,
        None => panic!("switch trap taken before the scheduler started"),
    }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __tickswitch_switch(saved: *mut StackWord) -> *mut StackWord {
    unsafe { installed(Exception::PendSV).switch(saved) }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __tickswitch_first_task() -> *mut StackWord {
    unsafe { installed(Exception::SVCall).first_task() }
}

global_asm!(
    ".syntax unified",
    ".section .text.PendSV",
    ".global PendSV",
    ".type PendSV,%function",
    ".thumb_func",
    "PendSV:",
    "mrs r0, psp",
    "subs r0, r0, #32",
    "mov r1, r0",
    "stmia r0!, {{r4-r7}}",
    "mov r4, r8",
    "mov r5, r9",
    "mov r6, r10",
    "mov r7, r11",
    "stmia r0!, {{r4-r7}}",
    "mov r0, r1",
    // r3 keeps the main stack 8-byte aligned across the call
    "push {{r3, lr}}",
    "bl __tickswitch_switch",
    "pop {{r2, r3}}",
    "adds r0, r0, #16",
    "ldmia r0!, {{r4-r7}}",
    "mov r8, r4",
    "mov r9, r5",
    "mov r10, r6",
    "mov r11, r7",
    "msr psp, r0",
    "subs r0, r0, #32",
    "ldmia r0!, {{r4-r7}}",
    "bx r3",
    ".size PendSV, . - PendSV",
);

global_asm!(
    ".syntax unified",
    ".section .text.SVCall",
    ".global SVCall",
    ".type SVCall,%function",
    ".thumb_func",
    "SVCall:",
    "push {{r3, lr}}",
    "bl __tickswitch_first_task",
    "pop {{r2, r3}}",
    "adds r0, r0, #16",
    "ldmia r0!, {{r4-r7}}",
    "mov r8, r4",
    "mov r9, r5",
    "mov r10, r6",
    "mov r11, r7",
    "msr psp, r0",
    "subs r0, r0, #32",
    "ldmia r0!, {{r4-r7}}",
    // thread mode, process stack
    "movs r1, #0x0d",
    "orrs r3, r1",
    "bx r3",
    ".size SVCall, . - SVCall",
);
