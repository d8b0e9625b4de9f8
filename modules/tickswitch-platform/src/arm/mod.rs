//! ARMv6-M (Cortex-M0/M0+) port
//!
//! - PendSV carries the deferred switch, at the lowest priority
//! - SVCall restores the first task
//! - SysTick drives the tick
//!
//! Masking uses PRIMASK. The vector glue is written for the Thumb-1
//! instruction subset, which cannot load or store r8-r11 directly.

mod platform;
mod systick;
mod vectors;

#[cfg(feature = "critical-section-impl")]
mod critical_section;

pub use platform::CortexM0;
pub use systick::SysTickSource;
