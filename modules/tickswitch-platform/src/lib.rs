#![no_std]

//! Architecture boundary of the tickswitch port
//!
//! Everything that depends on the exception model of the target lives here,
//! behind the traits in [`traits`]:
//!
//! - [`traits::Platform`]: interrupt masking, arming the deferred switch and
//!   launching the first task
//! - [`traits::TrapHandler`]: what the exception vectors call into
//! - [`traits::TickSource`] and [`traits::Clock`]: the periodic timer
//! - [`frame`]: the saved-register frame contract shared by every port
//!
//! ## Ports
//!
//! - `arm` (feature `cortex-m0`): ARMv6-M, PendSV for the deferred switch,
//!   SVCall for the first task, SysTick for the tick
//! - `sim` (feature `sim`): a host model of the same exception behaviour

#[macro_use]
extern crate tickswitch_log;

pub mod frame;
pub mod traits;

#[cfg(all(feature = "cortex-m0", target_arch = "arm"))]
pub mod arm;

#[cfg(feature = "sim")]
pub mod sim;

pub use traits::{Clock, Platform, TickCallback, TickSource, TimerError, TrapHandler};

/// One slot of a task stack. Pointer sized so entry addresses and
/// parameters fit in a single slot.
pub type StackWord = usize;
