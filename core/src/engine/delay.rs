//! The tiered delay schedule expressed as one generic
//! function. The base A/B/W schedule and both escalation cadences are the
//! same shape — "0 off-tier, a fixed minute count for the first few
//! tiers, then an implicit-random duration" — parameterized by period and
//! a delay table; the escalation cadences are just narrower tables
//! (`[30]`, `[]`) over the same function.

use super::rng::{exprand, DelayRng};

/// Returns a signed minute count: `0` if `n` is not a positive multiple of
/// `period`; `delays[k-1]` (positive, explicit) for tier `k = n/period` in
/// `1..=delays.len()`; otherwise `-exprand(implicit_min, implicit_max)`
/// (negative, implicit) once the fixed tiers are exhausted.
pub fn tiered_delay(
    n: u32,
    period: u32,
    delays: &[u32],
    implicit_min: u32,
    implicit_max: u32,
    rng: &dyn DelayRng,
) -> i64 {
    if n == 0 || n % period != 0 {
        return 0;
    }
    let tier = n / period;
    if (tier as usize) <= delays.len() {
        delays[(tier - 1) as usize] as i64
    } else {
        -(exprand(rng, implicit_min, implicit_max) as i64)
    }
}

/// `get_counter_ttl(n)` from: `min(n * delta, max)`.
pub fn counter_ttl_minutes(n: u32, delta: u32, max: u32) -> u32 {
    (n * delta).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRng;

    #[test]
    fn zero_off_tier() {
        let rng = SeededRng::new(1);
        assert_eq!(tiered_delay(0, 5, &[5, 10, 30, 60], 180, 1380, &rng), 0);
        assert_eq!(tiered_delay(3, 5, &[5, 10, 30, 60], 180, 1380, &rng), 0);
    }

    #[test]
    fn fixed_tiers_match_table() {
        let rng = SeededRng::new(1);
        assert_eq!(tiered_delay(5, 5, &[5, 10, 30, 60], 180, 1380, &rng), 5);
        assert_eq!(tiered_delay(10, 5, &[5, 10, 30, 60], 180, 1380, &rng), 10);
        assert_eq!(tiered_delay(15, 5, &[5, 10, 30, 60], 180, 1380, &rng), 30);
        assert_eq!(tiered_delay(20, 5, &[5, 10, 30, 60], 180, 1380, &rng), 60);
    }

    #[test]
    fn beyond_table_is_negative_and_bounded() {
        let rng = SeededRng::new(1);
        let t = tiered_delay(25, 5, &[5, 10, 30, 60], 180, 1380, &rng);
        assert!(t < 0);
        assert!((-t as u32) >= 180 && (-t as u32) <= 1380);
    }

    #[test]
    fn explicit_escalation_shape_is_single_tier_then_random() {
        let rng = SeededRng::new(2);
        assert_eq!(tiered_delay(9, 9, &[30], 180, 1380, &rng), 30);
        let beyond = tiered_delay(18, 9, &[30], 180, 1380, &rng);
        assert!(beyond < 0);
    }

    #[test]
    fn implicit_escalation_shape_is_always_random() {
        let rng = SeededRng::new(3);
        let t = tiered_delay(3, 3, &[], 180, 1380, &rng);
        assert!(t < 0);
    }
}
