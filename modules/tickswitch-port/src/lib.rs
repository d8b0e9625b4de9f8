#![no_std]

//! Context-switch and interrupt layer of a preemptive, tick-driven
//! scheduler
//!
//! The layer executes switches; which task runs next is decided by a
//! [`SchedulerCore`] supplied by the caller. All process-wide state (the
//! critical nesting counter and the current-task reference) lives in one
//! [`Kernel`] value. Boot code places it in a `static` and calls
//! [`Kernel::start_scheduler`]; the exception vectors reach it through
//! [`tickswitch_platform::TrapHandler`].
//!
//! ```ignore
//! static KERNEL: Kernel<CortexM0, MyCore> = Kernel::new(CortexM0, MyCore::new(), Config::DEFAULT);
//!
//! let mut systick = SysTickSource::take(48_000_000);
//! match KERNEL.start_scheduler(&mut systick) {
//!     Ok(never) => match never {},
//!     Err(e) => defmt::panic!("scheduler did not start: {}", e),
//! }
//! ```

#[macro_use]
extern crate tickswitch_log;

mod critical;
mod error;
mod kernel;
mod scheduler;
mod start;
mod switch;
mod task;
mod tick;
mod trap;
mod wait;

pub use critical::CriticalGuard;
pub use error::ConfigError;
pub use kernel::Kernel;
pub use scheduler::SchedulerCore;
pub use task::{TaskControlBlock, TaskHeader, TaskRef};
pub use tickswitch_cfg::Config;
pub use tickswitch_platform::frame::TaskEntry;
pub use tickswitch_platform::{Clock, Platform, StackWord, TickSource, TimerError};
pub use wait::{Timeout, wait_until};
