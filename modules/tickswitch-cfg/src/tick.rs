//! Tick rate selected by the `tick-hz-*` features, 1000 Hz when none is.

#[cfg(any(
    all(feature = "tick-hz-100", feature = "tick-hz-1000"),
    all(feature = "tick-hz-100", feature = "tick-hz-10000"),
    all(feature = "tick-hz-1000", feature = "tick-hz-10000"),
))]
compile_error!("enable at most one of the `tick-hz-100`, `tick-hz-1000` and `tick-hz-10000` features");

#[cfg(feature = "tick-hz-100")]
pub const TICK_HZ: u32 = 100;

#[cfg(feature = "tick-hz-10000")]
pub const TICK_HZ: u32 = 10_000;

#[cfg(not(any(feature = "tick-hz-100", feature = "tick-hz-10000")))]
pub const TICK_HZ: u32 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_matches_the_selected_feature() {
        let expected = if cfg!(feature = "tick-hz-100") {
            100
        } else if cfg!(feature = "tick-hz-10000") {
            10_000
        } else {
            1_000
        };
        assert_eq!(TICK_HZ, expected);
    }
}
