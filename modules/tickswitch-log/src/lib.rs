//! Logging macros for the tickswitch port
//!
//! One macro per subsystem, each taking a `defmt` level first:
//!
//! ```ignore
//! port_log!(info, "scheduler started, {} Hz tick", tick_hz);
//! ```
//!
//! A family whose `log-*` feature is on forwards to `defmt`; otherwise it
//! expands to nothing, so the hot paths of the port carry no logging cost.
//!
//! Crates that turn a family on must depend on `defmt` themselves, since
//! `defmt`'s own macros resolve `::defmt` at the call site.

#![no_std]

#[cfg(feature = "log-base")]
use defmt_rtt as _;

// scheduler start, configuration, priorities
#[cfg(feature = "log-port")]
#[macro_export]
macro_rules! port_log {
    ($level:ident, $($args:tt)*) => { defmt::$level!($($args)*); };
}

#[cfg(not(feature = "log-port"))]
#[macro_export]
macro_rules! port_log {
    ($level:ident, $($args:tt)*) => {};
}

// tick source binding and the periodic handler
#[cfg(feature = "log-tick")]
#[macro_export]
macro_rules! tick_log {
    ($level:ident, $($args:tt)*) => { defmt::$level!($($args)*); };
}

#[cfg(not(feature = "log-tick"))]
#[macro_export]
macro_rules! tick_log {
    ($level:ident, $($args:tt)*) => {};
}

// the context-switch trap and yield requests
#[cfg(feature = "log-switch")]
#[macro_export]
macro_rules! switch_log {
    ($level:ident, $($args:tt)*) => { defmt::$level!($($args)*); };
}

#[cfg(not(feature = "log-switch"))]
#[macro_export]
macro_rules! switch_log {
    ($level:ident, $($args:tt)*) => {};
}
