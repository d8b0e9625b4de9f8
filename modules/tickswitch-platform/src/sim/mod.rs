//! Host model of the ARMv6-M exception behaviour
//!
//! The model keeps a register file and a process stack pointer into real
//! memory, and takes the deferred switch, the supervisor call and the tick
//! the way the core does: hardware half stacked on entry, manually-saved
//! half written by the trap, both popped on return. Registers a handler may
//! clobber are overwritten with [`CLOBBER`], so a restore that misses a
//! register shows up in the register file.
//!
//! Exceptions pended while masked, or while a handler runs, are taken as
//! soon as the model is back in thread mode with interrupts unmasked; the
//! tick is taken before the deferred switch.

mod cpu;
mod platform;
mod timer;

pub use cpu::{CLOBBER, EXC_RETURN_THREAD_MSP, EXC_RETURN_THREAD_PSP, Registers};
pub use platform::{MAIN_STACK_TOP, SimPlatform};
pub use timer::SimTimer;
