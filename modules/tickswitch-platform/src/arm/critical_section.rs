use critical_section::{Impl, RawRestoreState, set_impl};

use super::CortexM0;
use crate::traits::Platform;

struct PrimaskCriticalSection;
set_impl!(PrimaskCriticalSection);

unsafe impl Impl for PrimaskCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        CortexM0.mask_from_isr()
    }

    unsafe fn release(was_masked: RawRestoreState) {
        // only unmask if interrupts were enabled before the critical section
        CortexM0.unmask_from_isr(was_masked);
    }
}
