//! SysTick tick source

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::interrupt::{self, Mutex};
use cortex_m::peripheral::SYST;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::exception;

use crate::traits::{Clock, SYSTICK_RELOAD_MAX, TickCallback, TickSource, TimerError, periodic_reload};

#[derive(Clone, Copy)]
struct TickBinding {
    callback: TickCallback,
    ctx: *mut (),
}

// The context pointer is only handed back to the callback it was bound with.
unsafe impl Send for TickBinding {}

static BINDING: Mutex<Cell<Option<TickBinding>>> = Mutex::new(Cell::new(None));

// armv6-m has no atomic read-modify-write; only the SysTick handler stores.
static TICKS: AtomicU32 = AtomicU32::new(0);

/// The core's 24-bit system timer clocked from the core clock
pub struct SysTickSource {
    syst: Option<SYST>,
    core_clock_hz: u32,
    bound: bool,
}

impl SysTickSource {
    pub fn new(syst: SYST, core_clock_hz: u32) -> Self {
        Self {
            syst: Some(syst),
            core_clock_hz,
            bound: false,
        }
    }

    /// Claim the timer from the core peripherals. Binding fails with
    /// [`TimerError::NotFound`] if they were already taken.
    pub fn take(core_clock_hz: u32) -> Self {
        Self {
            syst: cortex_m::Peripherals::take().map(|cp| cp.SYST),
            core_clock_hz,
            bound: false,
        }
    }
}

impl TickSource for SysTickSource {
    fn bind_periodic_source(&mut self, frequency_hz: u32, on_tick: TickCallback, ctx: *mut ()) -> Result<(), TimerError> {
        let syst = self.syst.as_mut().ok_or(TimerError::NotFound)?;
        let reload = periodic_reload(self.core_clock_hz, frequency_hz, SYSTICK_RELOAD_MAX)?;
        tick_log!(debug, "SysTick reload {}", reload);

        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(reload);
        syst.clear_current();
        interrupt::free(|cs| {
            BINDING.borrow(cs).set(Some(TickBinding { callback: on_tick, ctx }));
        });
        self.bound = true;
        Ok(())
    }

    fn start(&mut self) -> Result<(), TimerError> {
        let syst = self.syst.as_mut().ok_or(TimerError::NotFound)?;
        if !self.bound {
            return Err(TimerError::NotBound);
        }
        syst.enable_interrupt();
        syst.enable_counter();
        Ok(())
    }
}

impl Clock for SysTickSource {
    fn now(&self) -> u64 {
        TICKS.load(Ordering::Relaxed) as u64
    }
}

#[exception]
fn SysTick() {
    TICKS.store(TICKS.load(Ordering::Relaxed).wrapping_add(1), Ordering::Relaxed);
    if let Some(TickBinding { callback, ctx }) = interrupt::free(|cs| BINDING.borrow(cs).get()) {
        callback(ctx);
    }
}
