//! Core platform functionality trait definition

use crate::StackWord;

/// Core platform functionality required by the port
///
/// One implementation exists per target exception model. Nothing above this
/// trait names a hardware register; the kernel only asks for the operations
/// below.
pub trait Platform: Sync {
    /// What a successful scheduler launch evaluates to.
    ///
    /// On hardware the launch never returns and this is
    /// [`core::convert::Infallible`]. The host model returns once the first
    /// task has been restored so its register state can be inspected.
    type Never;

    /// Mask every maskable interrupt.
    fn disable_interrupts(&self);

    /// Unmask interrupts. Exceptions pended while masked are taken now.
    fn enable_interrupts(&self);

    /// Whether maskable interrupts are currently masked.
    fn interrupts_masked(&self) -> bool;

    /// Mask interrupts from a handler, returning whether they already were.
    fn mask_from_isr(&self) -> bool;

    /// Restore the mask state returned by [`Platform::mask_from_isr`].
    fn unmask_from_isr(&self, was_masked: bool);

    /// Arm the deferred switch exception.
    ///
    /// Arming is idempotent: any number of requests made before the
    /// exception is dispatched result in a single switch.
    ///
    /// Architecture-specific implementation:
    /// - ARM Cortex-M: set PENDSVSET in ICSR
    fn pend_switch(&self);

    /// Data and instruction barrier. A switch armed from thread mode with
    /// interrupts unmasked has been taken once this returns.
    fn synchronize(&self);

    /// Whether the caller runs in an exception handler.
    fn in_interrupt(&self) -> bool;

    /// Program the priorities of the deferred switch and of the tick.
    fn set_exception_priorities(&self, switch: u8, tick: u8);

    /// Reset the main stack, unmask interrupts and raise the one-shot
    /// supervisor call whose handler restores the current task.
    ///
    /// # Safety
    /// The handler must already name a current task whose saved stack
    /// pointer addresses a valid frame. Must be called from thread mode,
    /// exactly once.
    unsafe fn launch_first_task(&self, handler: &'static dyn TrapHandler) -> Self::Never;

    /// Mask interrupts and park the core for good.
    fn halt(&self) -> !;
}

impl<P: Platform + ?Sized> Platform for &P {
    type Never = P::Never;

    #[inline(always)]
    fn disable_interrupts(&self) {
        (**self).disable_interrupts()
    }

    #[inline(always)]
    fn enable_interrupts(&self) {
        (**self).enable_interrupts()
    }

    #[inline(always)]
    fn interrupts_masked(&self) -> bool {
        (**self).interrupts_masked()
    }

    #[inline(always)]
    fn mask_from_isr(&self) -> bool {
        (**self).mask_from_isr()
    }

    #[inline(always)]
    fn unmask_from_isr(&self, was_masked: bool) {
        (**self).unmask_from_isr(was_masked)
    }

    #[inline(always)]
    fn pend_switch(&self) {
        (**self).pend_switch()
    }

    #[inline(always)]
    fn synchronize(&self) {
        (**self).synchronize()
    }

    #[inline(always)]
    fn in_interrupt(&self) -> bool {
        (**self).in_interrupt()
    }

    fn set_exception_priorities(&self, switch: u8, tick: u8) {
        (**self).set_exception_priorities(switch, tick)
    }

    unsafe fn launch_first_task(&self, handler: &'static dyn TrapHandler) -> Self::Never {
        unsafe { (**self).launch_first_task(handler) }
    }

    fn halt(&self) -> ! {
        (**self).halt()
    }
}

/// Entry points the exception vectors forward to
///
/// The vectors themselves move registers; everything that decides which
/// task runs sits behind this trait.
pub trait TrapHandler: Sync {
    /// Deferred switch.
    ///
    /// `saved` is the address the manually-saved half of the interrupted
    /// task was just written to. Returns the address of the frame to
    /// restore.
    ///
    /// # Safety
    /// Only the deferred switch vector may call this, after writing the
    /// manually-saved half at `saved`.
    unsafe fn switch(&self, saved: *mut StackWord) -> *mut StackWord;

    /// Supervisor call raised by the first-task launch. Returns the address
    /// of the frame of the task selected before launch.
    ///
    /// # Safety
    /// Only the supervisor call vector may call this, once.
    unsafe fn first_task(&self) -> *mut StackWord;
}
