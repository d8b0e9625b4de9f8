//! Platform trait definitions

pub mod platform;
pub mod timer;

// Re-export for convenience
pub use platform::{Platform, TrapHandler};
pub use timer::{Clock, SYSTICK_RELOAD_MAX, TickCallback, TickSource, TimerError, periodic_reload};
