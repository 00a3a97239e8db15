use std::time::Duration;

/// Largest exponent applied to the base delay.
///
/// Caps the wait at `base × 2^10` so a misconfigured attempt budget cannot
/// produce multi-hour sleeps.
const MAX_EXPONENT: u32 = 10;

/// Computes the wait before re-attempting after the given 0-based attempt.
///
/// Pure exponential schedule: `base × 2^attempt`. With the default 5 second
/// base the waits are 5s, 10s, 20s, ... for attempts 0, 1, 2, ...
#[must_use]
pub fn delay_for_attempt(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(MAX_EXPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_with_five_second_base() {
        let base = Duration::from_secs(5);

        assert_eq!(delay_for_attempt(base, 0), Duration::from_secs(5));
        assert_eq!(delay_for_attempt(base, 1), Duration::from_secs(10));
        assert_eq!(delay_for_attempt(base, 2), Duration::from_secs(20));
    }

    #[test]
    fn test_schedule_scales_with_base() {
        let base = Duration::from_millis(1);

        assert_eq!(delay_for_attempt(base, 0), Duration::from_millis(1));
        assert_eq!(delay_for_attempt(base, 3), Duration::from_millis(8));
    }

    #[test]
    fn test_exponent_is_capped() {
        let base = Duration::from_secs(5);

        assert_eq!(delay_for_attempt(base, 10), delay_for_attempt(base, 63));
    }
}
