//! One-shot tools: the distinct number draw and the roulette spin.
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::{DrawCfg, RouletteCfg};
use crate::error::GameError;
use crate::rng::RandomSource;

/// Draw `count` distinct integers from `[min, max]`, returned ascending.
///
/// Every value is chosen uniformly among those not drawn yet.
///
/// # Errors
///
/// Returns [`GameError::InvalidCount`] when `min >= max`, when `count` is
/// not positive, or when `count` exceeds either the size of the range or
/// `cfg.max_count`. Nothing is drawn from `rng` on rejection.
pub fn draw_distinct(
    count: i64,
    min: i64,
    max: i64,
    cfg: &DrawCfg,
    rng: &mut RandomSource,
) -> Result<Vec<i64>, GameError> {
    let range_len = i128::from(max) - i128::from(min) + 1;
    let available = range_len.min(i128::from(cfg.max_count));
    if min >= max || count < 1 || i128::from(count) > available {
        return Err(GameError::InvalidCount {
            count,
            available: i64::try_from(available).unwrap_or(i64::MAX).max(0),
        });
    }

    let drawn = match (usize::try_from(range_len), usize::try_from(count)) {
        (Ok(length), Ok(amount)) => index::sample(rng, length, amount)
            .into_iter()
            .filter_map(|offset| offset_value(min, offset))
            .collect::<BTreeSet<i64>>(),
        _ => rejection_sample(count, min, max, rng)?,
    };
    Ok(drawn.into_iter().collect())
}

fn offset_value(min: i64, offset: usize) -> Option<i64> {
    let offset = i128::try_from(offset).ok()?;
    i64::try_from(i128::from(min) + offset).ok()
}

fn rejection_sample(
    count: i64,
    min: i64,
    max: i64,
    rng: &mut RandomSource,
) -> Result<BTreeSet<i64>, GameError> {
    let target = usize::try_from(count).unwrap_or(usize::MAX);
    let mut drawn = BTreeSet::new();
    while drawn.len() < target {
        drawn.insert(rng.draw_int(min, max)?);
    }
    Ok(drawn)
}

/// Parse a numeric field of the draw form.
///
/// # Errors
///
/// Returns [`GameError::NonNumericBound`] when the text is not an integer.
pub fn parse_bound(text: &str) -> Result<i64, GameError> {
    text.trim()
        .parse()
        .map_err(|_| GameError::NonNumericBound {
            input: text.to_string(),
        })
}

/// [`draw_distinct`] over raw form input.
///
/// # Errors
///
/// Non-numeric fields are rejected before any range checks.
pub fn draw_distinct_text(
    count: &str,
    min: &str,
    max: &str,
    cfg: &DrawCfg,
    rng: &mut RandomSource,
) -> Result<Vec<i64>, GameError> {
    let count = parse_bound(count)?;
    let min = parse_bound(min)?;
    let max = parse_bound(max)?;
    draw_distinct(count, min, max, cfg, rng)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub number: i64,
    pub phrase: String,
}

/// Spin the wheel: a number plus a flavour phrase, independent of any
/// earlier spin.
#[must_use]
pub fn spin(cfg: &RouletteCfg, rng: &mut RandomSource) -> SpinResult {
    let number = rng.draw_int(cfg.min, cfg.max).unwrap_or(cfg.min);
    let phrase = rng.pick(&cfg.phrases).cloned().unwrap_or_default();
    SpinResult { number, phrase }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_distinct_sorted_and_in_range() {
        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        for _ in 0..50 {
            let drawn = draw_distinct(6, 1, 60, &cfg, &mut rng).unwrap();
            assert_eq!(drawn.len(), 6);
            assert!(drawn.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(drawn.iter().all(|n| (1..=60).contains(n)));
        }
    }

    #[test]
    fn drawing_the_whole_range_returns_every_value() {
        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        assert_eq!(
            draw_distinct(5, -2, 2, &cfg, &mut rng),
            Ok(vec![-2, -1, 0, 1, 2])
        );
    }

    #[test]
    fn count_larger_than_range_is_rejected() {
        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        assert_eq!(
            draw_distinct(11, 1, 10, &cfg, &mut rng),
            Err(GameError::InvalidCount {
                count: 11,
                available: 10
            })
        );
        assert!(draw_distinct(1, 10, 10, &cfg, &mut rng).is_err());
        assert!(draw_distinct(0, 1, 10, &cfg, &mut rng).is_err());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn text_input_must_be_numeric() {
        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        let err = draw_distinct_text("3", "um", "10", &cfg, &mut rng).unwrap_err();
        assert!(err.is_range_error());
        assert_eq!(draw_distinct_text(" 2", "1 ", "2", &cfg, &mut rng), Ok(vec![1, 2]));
    }

    #[test]
    fn counts_above_the_configured_limit_are_rejected_before_sampling() {
        let cfg = DrawCfg { max_count: 50 };
        let mut rng = RandomSource::from_seed(5);
        assert_eq!(
            draw_distinct(51, 1, 1_000, &cfg, &mut rng),
            Err(GameError::InvalidCount {
                count: 51,
                available: 50
            })
        );
        assert_eq!(draw_distinct(50, 1, 1_000, &cfg, &mut rng).map(|d| d.len()), Ok(50));

        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        let err = draw_distinct_text("1000000000", "0", "1000000000000", &cfg, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidCount {
                count: 1_000_000_000,
                available: 1_000
            }
        );
        assert!(draw_distinct(i64::MAX, i64::MIN, i64::MAX, &cfg, &mut rng).is_err());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn small_draw_from_the_full_i64_range_terminates() {
        let cfg = DrawCfg::default();
        let mut rng = RandomSource::from_seed(5);
        let drawn = draw_distinct(3, i64::MIN, i64::MAX, &cfg, &mut rng).unwrap();
        assert_eq!(drawn.len(), 3);
        assert!(drawn.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn spin_stays_in_wheel_and_uses_known_phrases() {
        let cfg = RouletteCfg::default();
        let mut rng = RandomSource::from_seed(19);
        for _ in 0..100 {
            let result = spin(&cfg, &mut rng);
            assert!((1..=10).contains(&result.number));
            assert!(cfg.phrases.contains(&result.phrase));
        }
    }
}
