#![no_std]

//! Configuration of the tickswitch port.
//!
//! Constants are fixed by Cargo features; [`Config`] carries the values the
//! board only knows at boot (the core clock) and is handed to the kernel.

mod tick;

/// Ticks per second of the scheduling time base.
///
/// This value is specified by the Cargo features "`tick-hz-*`"
pub const TICK_HZ: u32 = tick::TICK_HZ;

/// Whether every tick arms a deferred switch.
pub const USE_PREEMPTION: bool = cfg!(feature = "preemption");

/// Priority of the deferred switch exception. The lowest the hardware has,
/// so a switch never interrupts another handler.
pub const SWITCH_PRIORITY: u8 = 0xFF;

/// Priority of the tick exception. Above the deferred switch, so advancing
/// the tick always happens-before the switch it arms.
pub const TICK_PRIORITY: u8 = 0x80;

/// Core clock assumed until the board reports its own.
pub const DEFAULT_CORE_CLOCK_HZ: u32 = 48_000_000;

/// Boot-time configuration of the port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Frequency the tick source is bound to
    pub tick_hz: u32,
    /// Input clock of the tick source
    pub core_clock_hz: u32,
    /// Arm a deferred switch on every tick
    pub preemption: bool,
}

impl Config {
    /// Configuration built from the enabled features.
    pub const DEFAULT: Config = Config {
        tick_hz: TICK_HZ,
        core_clock_hz: DEFAULT_CORE_CLOCK_HZ,
        preemption: USE_PREEMPTION,
    };

    pub const fn with_core_clock(mut self, core_clock_hz: u32) -> Self {
        self.core_clock_hz = core_clock_hz;
        self
    }

    pub const fn with_tick_hz(mut self, tick_hz: u32) -> Self {
        self.tick_hz = tick_hz;
        self
    }

    /// Ticks advance the time base but never arm a switch.
    pub const fn cooperative(mut self) -> Self {
        self.preemption = false;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
