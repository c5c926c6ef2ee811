//! # Game Mathematics
//!
//! Integer helpers for damage and percentage calculations.

use crate::config::DAMAGE_VARIANCE_PCT;
use rand::Rng;

/// `floor(value * permille / 1000)` in exact integer arithmetic, never below
/// zero.
pub fn scaled_floor(value: i32, permille: u32) -> i32 {
    (i64::from(value.max(0)) * i64::from(permille) / 1000) as i32
}

/// Half-width of the symmetric variance window around `base`.
pub fn variance_window(base: i32) -> i32 {
    base.max(0) * DAMAGE_VARIANCE_PCT / 100
}

/// Rolls `base` plus a symmetric offset within [`variance_window`].
///
/// A window of zero consumes no randomness.
pub fn roll_with_variance<R: Rng + ?Sized>(base: i32, rng: &mut R) -> i32 {
    let window = variance_window(base);
    if window == 0 {
        return base;
    }
    base + rng.gen_range(-window..=window)
}

/// Damage left after defense; every landed hit deals at least 1.
pub fn mitigate(raw: i32, defense: i32) -> i32 {
    (raw - defense.max(0)).max(1)
}

/// Percentage of `value` out of `max`, clamped to 0-100.
pub fn ratio_pct(value: i64, max: i64) -> i32 {
    if max <= 0 {
        return 0;
    }
    (value.clamp(0, max) * 100 / max) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scaled_floor() {
        assert_eq!(scaled_floor(10, 1500), 15);
        assert_eq!(scaled_floor(7, 1400), 9);
        assert_eq!(scaled_floor(45, 1400), 63);
        assert_eq!(scaled_floor(30, 900), 27);
        assert_eq!(scaled_floor(-3, 2000), 0);
    }

    #[test]
    fn test_roll_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = roll_with_variance(15, &mut rng);
            assert!((14..=16).contains(&value));
        }
    }

    #[test]
    fn test_small_values_have_no_variance() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(roll_with_variance(9, &mut rng), 9);
    }

    #[test]
    fn test_mitigate_minimum() {
        assert_eq!(mitigate(10, 3), 7);
        assert_eq!(mitigate(2, 50), 1);
        assert_eq!(mitigate(5, -4), 5);
    }

    #[test]
    fn test_ratio_pct() {
        assert_eq!(ratio_pct(50, 200), 25);
        assert_eq!(ratio_pct(300, 200), 100);
        assert_eq!(ratio_pct(5, 0), 0);
    }
}
