//! Tick Source Traits and Types
//!
//! A tick source is one periodic hardware timer driving the scheduling time
//! base. It is bound once at scheduler start:
//!
//! - [`TickSource::bind_periodic_source`] programs the period and registers
//!   the callback run on every expiry
//! - [`TickSource::start`] lets the timer run
//!
//! The callback is a plain function pointer plus an opaque context pointer,
//! so the handler can be reached from an exception vector that takes no
//! arguments.

use core::fmt;

/// Callback run once per tick period, from the tick exception.
pub type TickCallback = fn(*mut ());

/// Failure to bind or start a tick source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No timer device exists or it was already claimed
    NotFound,
    /// A tick frequency of zero, or above the input clock
    InvalidFrequency,
    /// The period does not fit the timer's reload register
    ReloadOutOfRange,
    /// `start` was called before a period was bound
    NotBound,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::NotFound => f.write_str("no tick timer available"),
            TimerError::InvalidFrequency => f.write_str("tick frequency not reachable from the input clock"),
            TimerError::ReloadOutOfRange => f.write_str("tick period exceeds the reload register"),
            TimerError::NotBound => f.write_str("tick timer started before being bound"),
        }
    }
}

/// Periodic timer driving the scheduling time base
pub trait TickSource {
    /// Program the timer to expire `frequency_hz` times per second and run
    /// `on_tick(ctx)` on every expiry.
    fn bind_periodic_source(&mut self, frequency_hz: u32, on_tick: TickCallback, ctx: *mut ()) -> Result<(), TimerError>;

    /// Let the bound timer run.
    fn start(&mut self) -> Result<(), TimerError>;
}

/// Monotonic count of elapsed ticks
pub trait Clock {
    fn now(&self) -> u64;
}

/// Widest reload value of the ARMv6-M system timer (24 bits).
pub const SYSTICK_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Reload value of a down-counting timer clocked at `input_hz` so that it
/// wraps `frequency_hz` times per second.
///
/// `max_reload` is the widest value the reload register holds.
pub const fn periodic_reload(input_hz: u32, frequency_hz: u32, max_reload: u32) -> Result<u32, TimerError> {
    if frequency_hz == 0 || frequency_hz > input_hz {
        return Err(TimerError::InvalidFrequency);
    }
    let reload = input_hz / frequency_hz - 1;
    if reload == 0 || reload > max_reload {
        return Err(TimerError::ReloadOutOfRange);
    }
    Ok(reload)
}
