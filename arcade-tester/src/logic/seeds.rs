use anyhow::{Context, Result, bail};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const SWEEP_PREFIX: &str = "sweep:";
const SWEEP_BASE: u64 = 0xA5CA_DE00;
const MAX_SWEEP: usize = 10_000;

/// Where a seed came from, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    Literal,
    Sweep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub source: SeedSource,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            source: SeedSource::Literal,
        }
    }

    #[must_use]
    const fn from_sweep(seed: u64) -> Self {
        Self {
            seed,
            source: SeedSource::Sweep,
        }
    }
}

/// Resolve CLI seed arguments into concrete seeds.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals and `sweep:N`, which expands to `N` reproducible pseudo-random
/// seeds. Duplicates keep their first position; an empty list falls back to
/// the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some(count) = token.strip_prefix(SWEEP_PREFIX) {
            let count: usize = count
                .parse()
                .with_context(|| format!("invalid sweep size in {token}"))?;
            if count > MAX_SWEEP {
                bail!("sweep of {count} seeds exceeds the limit of {MAX_SWEEP}");
            }
            pending.extend(sweep(count));
            continue;
        }

        if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            let value = u64::from_str_radix(hex, 16)
                .with_context(|| format!("invalid hex seed {token}"))?;
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    pending.retain(|info| seen.insert(info.seed));

    if pending.is_empty() {
        pending.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(pending)
}

fn sweep(count: usize) -> impl Iterator<Item = SeedInfo> {
    let mut rng = ChaCha8Rng::seed_from_u64(SWEEP_BASE);
    (0..count).map(move |_| SeedInfo::from_sweep(rng.next_u64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_decimal_hex_and_negative() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "0xff", "-7"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![42, 255, 7]);
        assert!(seeds.iter().all(|s| s.source == SeedSource::Literal));
    }

    #[test]
    fn sweep_is_reproducible_and_distinct() {
        let first = resolve_seed_inputs(&tokens(&["sweep:5"])).unwrap();
        let second = resolve_seed_inputs(&tokens(&["sweep:5"])).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!(first.iter().all(|s| s.source == SeedSource::Sweep));
    }

    #[test]
    fn duplicates_are_dropped_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["9", "3", "9", "0x9"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![9, 3]);
    }

    #[test]
    fn empty_input_uses_default() {
        let seeds = resolve_seed_inputs(&tokens(&["", "  "])).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["sweep:many"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["sweep:20000"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xzz"])).is_err());
    }
}
