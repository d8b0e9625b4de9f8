use core::arch::asm;
use core::convert::Infallible;

use cortex_m::interrupt;
use cortex_m::peripheral::SCB;
use cortex_m::peripheral::scb::{SystemHandler, VectActive};
use cortex_m::register::primask;

use super::vectors;
use crate::traits::{Platform, TrapHandler};

/// Cortex-M0 platform implementation
///
/// Stateless: every operation goes straight to PRIMASK or the system
/// control block, so one value can be shared by the kernel and the vector
/// glue.
#[derive(Clone, Copy, Debug, Default)]
pub struct CortexM0;

impl Platform for CortexM0 {
    type Never = Infallible;

    #[inline(always)]
    fn disable_interrupts(&self) {
        interrupt::disable();
    }

    #[inline(always)]
    fn enable_interrupts(&self) {
        unsafe { interrupt::enable() }
    }

    #[inline(always)]
    fn interrupts_masked(&self) -> bool {
        primask::read().is_inactive()
    }

    #[inline(always)]
    fn mask_from_isr(&self) -> bool {
        let was_masked = self.interrupts_masked();
        interrupt::disable();
        was_masked
    }

    #[inline(always)]
    fn unmask_from_isr(&self, was_masked: bool) {
        if !was_masked {
            unsafe { interrupt::enable() }
        }
    }

    /// Set PENDSVSET in ICSR.
    #[inline(always)]
    fn pend_switch(&self) {
        SCB::set_pendsv();
    }

    #[inline(always)]
    fn synchronize(&self) {
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
    }

    #[inline(always)]
    fn in_interrupt(&self) -> bool {
        SCB::vect_active() != VectActive::ThreadMode
    }

    fn set_exception_priorities(&self, switch: u8, tick: u8) {
        port_log!(debug, "PendSV priority {:x}, SysTick priority {:x}", switch, tick);
        // the port owns these two priority fields; nothing else touches SHPR3
        let mut cp = unsafe { cortex_m::Peripherals::steal() };
        unsafe {
            cp.SCB.set_priority(SystemHandler::PendSV, switch);
            cp.SCB.set_priority(SystemHandler::SysTick, tick);
        }
    }

    /// Load the main stack pointer from the vector table, point the process
    /// stack at the boot scratch area, unmask and raise `svc 0`. Cortex-M0
    /// has no VTOR, so the table sits at address 0.
    unsafe fn launch_first_task(&self, handler: &'static dyn TrapHandler) -> Infallible {
        unsafe {
            vectors::install(handler);
            asm!(
                "ldr r0, [r0]",
                "msr msp, r0",
                // a tick pended while masked is taken at cpsie and its
                // PendSV tail-chains before the svc
                "msr psp, r1",
                "cpsie i",
                "dsb",
                "isb",
                "svc 0",
                "udf #0",
                in("r0") 0usize,
                in("r1") vectors::boot_process_stack(),
                options(noreturn),
            )
        }
    }

    fn halt(&self) -> ! {
        port_log!(info, "scheduler ended, halting");
        interrupt::disable();
        loop {
            cortex_m::asm::wfi();
        }
    }
}
