//! Tunable parameters for every game.
//!
//! The defaults ship as a bundled JSON asset; any field missing from a
//! supplied document falls back to the constants in [`crate::constants`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BLACKJACK_CARD_MAX, BLACKJACK_CARD_MIN, BLACKJACK_DEALER_STAND, BLACKJACK_TARGET,
    DRAW_MAX_COUNT, GUESS_DEFAULT_MAX, GUESS_DEFAULT_MAX_ATTEMPTS, GUESS_DEFAULT_MIN,
    MEMORY_DEFAULT_SYMBOLS, MEMORY_REVERT_DELAY_MS, ODD_EVEN_MAX, ODD_EVEN_MIN,
    ODD_EVEN_POINTS_PER_HIT, REACTION_MAX_DELAY_MS, REACTION_MIN_DELAY_MS, ROULETTE_MAX,
    ROULETTE_MIN, ROULETTE_PHRASES,
};

const DEFAULT_ARCADE_DATA: &str = include_str!("../assets/arcade.json");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{game}: minimum {min} must be lower than maximum {max}")]
    InvertedRange {
        game: &'static str,
        min: i64,
        max: i64,
    },
    #[error("number guess needs at least one attempt")]
    NoAttempts,
    #[error("memory needs at least two distinct symbols (got {count})")]
    TooFewSymbols { count: usize },
    #[error("memory symbol {symbol:?} appears more than once")]
    DuplicateSymbol { symbol: String },
    #[error("blackjack dealer stands at {stand} which exceeds target {target}")]
    DealerAboveTarget { stand: u32, target: u32 },
    #[error("number draw must allow at least one number per draw")]
    NoDrawCount,
    #[error("roulette needs at least one phrase")]
    NoPhrases,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberGuessCfg {
    #[serde(default = "NumberGuessCfg::default_min")]
    pub min: i64,
    #[serde(default = "NumberGuessCfg::default_max")]
    pub max: i64,
    #[serde(default = "NumberGuessCfg::default_max_attempts")]
    pub max_attempts: u32,
}

impl NumberGuessCfg {
    const fn default_min() -> i64 {
        GUESS_DEFAULT_MIN
    }

    const fn default_max() -> i64 {
        GUESS_DEFAULT_MAX
    }

    const fn default_max_attempts() -> u32 {
        GUESS_DEFAULT_MAX_ATTEMPTS
    }
}

impl Default for NumberGuessCfg {
    fn default() -> Self {
        Self {
            min: GUESS_DEFAULT_MIN,
            max: GUESS_DEFAULT_MAX,
            max_attempts: GUESS_DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCfg {
    #[serde(default = "MemoryCfg::default_symbols")]
    pub symbols: Vec<String>,
    #[serde(default = "MemoryCfg::default_revert_delay_ms")]
    pub revert_delay_ms: u64,
}

impl MemoryCfg {
    fn default_symbols() -> Vec<String> {
        MEMORY_DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect()
    }

    const fn default_revert_delay_ms() -> u64 {
        MEMORY_REVERT_DELAY_MS
    }
}

impl Default for MemoryCfg {
    fn default() -> Self {
        Self {
            symbols: Self::default_symbols(),
            revert_delay_ms: MEMORY_REVERT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddEvenCfg {
    #[serde(default = "OddEvenCfg::default_min")]
    pub min: i64,
    #[serde(default = "OddEvenCfg::default_max")]
    pub max: i64,
    #[serde(default = "OddEvenCfg::default_points")]
    pub points_per_hit: u32,
}

impl OddEvenCfg {
    const fn default_min() -> i64 {
        ODD_EVEN_MIN
    }

    const fn default_max() -> i64 {
        ODD_EVEN_MAX
    }

    const fn default_points() -> u32 {
        ODD_EVEN_POINTS_PER_HIT
    }
}

impl Default for OddEvenCfg {
    fn default() -> Self {
        Self {
            min: ODD_EVEN_MIN,
            max: ODD_EVEN_MAX,
            points_per_hit: ODD_EVEN_POINTS_PER_HIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCfg {
    #[serde(default = "ReactionCfg::default_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "ReactionCfg::default_max_delay")]
    pub max_delay_ms: u64,
}

impl ReactionCfg {
    const fn default_min_delay() -> u64 {
        REACTION_MIN_DELAY_MS
    }

    const fn default_max_delay() -> u64 {
        REACTION_MAX_DELAY_MS
    }
}

impl Default for ReactionCfg {
    fn default() -> Self {
        Self {
            min_delay_ms: REACTION_MIN_DELAY_MS,
            max_delay_ms: REACTION_MAX_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackCfg {
    #[serde(default = "BlackjackCfg::default_card_min")]
    pub card_min: u8,
    #[serde(default = "BlackjackCfg::default_card_max")]
    pub card_max: u8,
    #[serde(default = "BlackjackCfg::default_target")]
    pub target: u32,
    #[serde(default = "BlackjackCfg::default_dealer_stand")]
    pub dealer_stand: u32,
}

impl BlackjackCfg {
    const fn default_card_min() -> u8 {
        BLACKJACK_CARD_MIN
    }

    const fn default_card_max() -> u8 {
        BLACKJACK_CARD_MAX
    }

    const fn default_target() -> u32 {
        BLACKJACK_TARGET
    }

    const fn default_dealer_stand() -> u32 {
        BLACKJACK_DEALER_STAND
    }
}

impl Default for BlackjackCfg {
    fn default() -> Self {
        Self {
            card_min: BLACKJACK_CARD_MIN,
            card_max: BLACKJACK_CARD_MAX,
            target: BLACKJACK_TARGET,
            dealer_stand: BLACKJACK_DEALER_STAND,
        }
    }
}

/// Limits of the distinct number draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCfg {
    /// Largest count a single draw may ask for.
    #[serde(default = "DrawCfg::default_max_count")]
    pub max_count: u32,
}

impl DrawCfg {
    const fn default_max_count() -> u32 {
        DRAW_MAX_COUNT
    }
}

impl Default for DrawCfg {
    fn default() -> Self {
        Self {
            max_count: DRAW_MAX_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteCfg {
    #[serde(default = "RouletteCfg::default_min")]
    pub min: i64,
    #[serde(default = "RouletteCfg::default_max")]
    pub max: i64,
    #[serde(default = "RouletteCfg::default_phrases")]
    pub phrases: Vec<String>,
}

impl RouletteCfg {
    const fn default_min() -> i64 {
        ROULETTE_MIN
    }

    const fn default_max() -> i64 {
        ROULETTE_MAX
    }

    fn default_phrases() -> Vec<String> {
        ROULETTE_PHRASES.iter().map(ToString::to_string).collect()
    }
}

impl Default for RouletteCfg {
    fn default() -> Self {
        Self {
            min: ROULETTE_MIN,
            max: ROULETTE_MAX,
            phrases: Self::default_phrases(),
        }
    }
}

/// Parameters for the whole arcade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArcadeConfig {
    #[serde(default)]
    pub number_guess: NumberGuessCfg,
    #[serde(default)]
    pub memory: MemoryCfg,
    #[serde(default)]
    pub odd_even: OddEvenCfg,
    #[serde(default)]
    pub reaction: ReactionCfg,
    #[serde(default)]
    pub blackjack: BlackjackCfg,
    #[serde(default)]
    pub number_draw: DrawCfg,
    #[serde(default)]
    pub roulette: RouletteCfg,
}

impl ArcadeConfig {
    /// Configuration bundled with the crate, falling back to compiled-in
    /// constants if the asset fails to parse or validate.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_ARCADE_DATA) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("bundled arcade config rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail
    /// [`ArcadeConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let guess = &self.number_guess;
        if guess.min >= guess.max {
            return Err(ConfigError::InvertedRange {
                game: "number_guess",
                min: guess.min,
                max: guess.max,
            });
        }
        if guess.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        let symbols = &self.memory.symbols;
        if symbols.len() < 2 {
            return Err(ConfigError::TooFewSymbols {
                count: symbols.len(),
            });
        }
        for (idx, symbol) in symbols.iter().enumerate() {
            if symbols[..idx].contains(symbol) {
                return Err(ConfigError::DuplicateSymbol {
                    symbol: symbol.clone(),
                });
            }
        }

        if self.odd_even.min >= self.odd_even.max {
            return Err(ConfigError::InvertedRange {
                game: "odd_even",
                min: self.odd_even.min,
                max: self.odd_even.max,
            });
        }

        let reaction = &self.reaction;
        if reaction.min_delay_ms > reaction.max_delay_ms {
            return Err(ConfigError::InvertedRange {
                game: "reaction",
                min: i64::try_from(reaction.min_delay_ms).unwrap_or(i64::MAX),
                max: i64::try_from(reaction.max_delay_ms).unwrap_or(i64::MAX),
            });
        }

        let blackjack = &self.blackjack;
        if blackjack.card_min > blackjack.card_max {
            return Err(ConfigError::InvertedRange {
                game: "blackjack",
                min: i64::from(blackjack.card_min),
                max: i64::from(blackjack.card_max),
            });
        }
        if blackjack.dealer_stand > blackjack.target {
            return Err(ConfigError::DealerAboveTarget {
                stand: blackjack.dealer_stand,
                target: blackjack.target,
            });
        }

        if self.number_draw.max_count == 0 {
            return Err(ConfigError::NoDrawCount);
        }

        if self.roulette.min > self.roulette.max {
            return Err(ConfigError::InvertedRange {
                game: "roulette",
                min: self.roulette.min,
                max: self.roulette.max,
            });
        }
        if self.roulette.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_asset_matches_compiled_defaults() {
        assert_eq!(ArcadeConfig::load_from_static(), ArcadeConfig::default());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = ArcadeConfig::from_json(r#"{"number_guess": {"max_attempts": 5}}"#).unwrap();
        assert_eq!(cfg.number_guess.max_attempts, 5);
        assert_eq!(cfg.number_guess.max, GUESS_DEFAULT_MAX);
        assert_eq!(cfg.memory.symbols.len(), MEMORY_DEFAULT_SYMBOLS.len());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = ArcadeConfig::default();
        cfg.memory.symbols = vec!["A".into(), "A".into()];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateSymbol { symbol: "A".into() })
        );

        let mut cfg = ArcadeConfig::default();
        cfg.blackjack.dealer_stand = 30;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DealerAboveTarget { .. })
        ));

        let mut cfg = ArcadeConfig::default();
        cfg.number_draw.max_count = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::NoDrawCount));

        let mut cfg = ArcadeConfig::default();
        cfg.number_guess.min = 10;
        cfg.number_guess.max = 10;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedRange {
                game: "number_guess",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ArcadeConfig::from_json("{ not json").is_err());
    }
}
