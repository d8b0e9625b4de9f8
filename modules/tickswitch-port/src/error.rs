use core::fmt;

use tickswitch_platform::TimerError;

/// Why the scheduler did not start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No tick timer could be found
    NoTickSource,
    /// The tick timer refused the configured rate or failed to start
    TickSourceRejected(TimerError),
    /// The scheduler core has no task to launch
    NoRunnableTask,
    /// `start_scheduler` was already called
    AlreadyStarted,
}

impl From<TimerError> for ConfigError {
    fn from(e: TimerError) -> Self {
        match e {
            TimerError::NotFound => ConfigError::NoTickSource,
            e => ConfigError::TickSourceRejected(e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoTickSource => f.write_str("no tick source"),
            ConfigError::TickSourceRejected(e) => write!(f, "tick source rejected: {}", e),
            ConfigError::NoRunnableTask => f.write_str("no runnable task"),
            ConfigError::AlreadyStarted => f.write_str("scheduler already started"),
        }
    }
}
