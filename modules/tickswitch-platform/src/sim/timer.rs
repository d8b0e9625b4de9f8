//! Host tick source

use super::SimPlatform;
use crate::traits::{Clock, SYSTICK_RELOAD_MAX, TickCallback, TickSource, TimerError, periodic_reload};

/// A 24-bit down-counting timer attached to a [`SimPlatform`]
///
/// Time does not pass on its own: every [`SimTimer::fire`] is one expiry.
pub struct SimTimer {
    platform: &'static SimPlatform,
    present: bool,
    input_hz: u32,
    reload: Option<u32>,
    running: bool,
}

impl SimTimer {
    pub const fn new(platform: &'static SimPlatform, input_hz: u32) -> Self {
        Self {
            platform,
            present: true,
            input_hz,
            reload: None,
            running: false,
        }
    }

    /// A board without a usable timer.
    pub const fn missing(platform: &'static SimPlatform) -> Self {
        Self {
            platform,
            present: false,
            input_hz: 0,
            reload: None,
            running: false,
        }
    }

    /// Reload value programmed by the last successful bind.
    pub fn reload(&self) -> Option<u32> {
        self.reload
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// The counter wraps. Pends the tick exception if the timer runs.
    pub fn fire(&self) {
        if self.running {
            self.platform.raise_tick();
        }
    }
}

impl TickSource for SimTimer {
    fn bind_periodic_source(&mut self, frequency_hz: u32, on_tick: TickCallback, ctx: *mut ()) -> Result<(), TimerError> {
        if !self.present {
            return Err(TimerError::NotFound);
        }
        let reload = periodic_reload(self.input_hz, frequency_hz, SYSTICK_RELOAD_MAX)?;
        tick_log!(debug, "sim timer bound, reload {}", reload);
        self.platform.bind_tick(on_tick, ctx);
        self.reload = Some(reload);
        Ok(())
    }

    fn start(&mut self) -> Result<(), TimerError> {
        if !self.present {
            return Err(TimerError::NotFound);
        }
        if self.reload.is_none() {
            return Err(TimerError::NotBound);
        }
        self.running = true;
        Ok(())
    }
}

impl Clock for SimTimer {
    fn now(&self) -> u64 {
        self.platform.ticks()
    }
}
