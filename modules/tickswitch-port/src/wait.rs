//! Bounded polling for hardware-ready conditions

use core::fmt;

use tickswitch_platform::Clock;

/// The condition did not hold within the allowed ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timed out")
    }
}

/// Poll `ready` until it returns `true` or `timeout` ticks of `clock`
/// have passed.
///
/// `ready` is polled at least once, and once more after the deadline, so
/// a condition that holds by then is never reported as a timeout.
pub fn wait_until<C, F>(clock: &C, timeout: u64, mut ready: F) -> Result<(), Timeout>
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let start = clock.now();
    loop {
        let expired = clock.now().wrapping_sub(start) >= timeout;
        if ready() {
            return Ok(());
        }
        if expired {
            return Err(Timeout);
        }
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    /// Advances one tick per reading.
    struct Stepping(Cell<u64>);

    impl Clock for Stepping {
        fn now(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 1);
            now
        }
    }

    #[test]
    fn ready_condition_returns_ok() {
        let clock = Stepping(Cell::new(0));
        let mut polls = 0;
        assert_eq!(
            wait_until(&clock, 100, || {
                polls += 1;
                polls == 3
            }),
            Ok(())
        );
        assert_eq!(polls, 3);
    }

    #[test]
    fn stuck_condition_times_out() {
        let clock = Stepping(Cell::new(0));
        let mut polls = 0;
        assert_eq!(
            wait_until(&clock, 5, || {
                polls += 1;
                false
            }),
            Err(Timeout)
        );
        assert!(polls >= 5);
    }

    #[test]
    fn zero_timeout_still_polls_once() {
        let clock = Stepping(Cell::new(0));
        assert_eq!(wait_until(&clock, 0, || true), Ok(()));
        assert_eq!(wait_until(&clock, 0, || false), Err(Timeout));
    }
}
