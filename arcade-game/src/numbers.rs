//! Numeric conversion helpers centralizing lossy casts.

use num_traits::cast::cast;

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Arithmetic mean of millisecond samples, `None` when there are none.
#[must_use]
pub fn mean_ms(samples: &[u64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: f64 = samples.iter().copied().map(u64_to_f64).sum();
    Some(total / u64_to_f64(samples.len() as u64))
}

/// `part / whole` as a fraction, 0.0 when `whole` is zero.
#[must_use]
pub fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole)
}

/// Round a fraction in `[0, 1]` to a whole percentage.
#[must_use]
pub fn percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    let clamped = (fraction.clamp(0.0, 1.0) * 100.0).round();
    cast::<f64, u8>(clamped).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_handles_empty_and_values() {
        assert_eq!(mean_ms(&[]), None);
        assert_eq!(mean_ms(&[310, 400]), Some(355.0));
    }

    #[test]
    fn ratio_guards_zero() {
        assert!((ratio(3, 0) - 0.0).abs() < f64::EPSILON);
        assert!((ratio(1, 4) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_clamps() {
        assert_eq!(percent(0.456), 46);
        assert_eq!(percent(f64::NAN), 0);
        assert_eq!(percent(3.0), 100);
    }
}
