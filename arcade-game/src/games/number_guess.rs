//! Guess the hidden number within a limited number of attempts.
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::outcome::{GameKind, Metric, Outcome};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessHint {
    TooHigh,
    TooLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessStatus {
    Active,
    Won,
    Lost,
}

/// What a single accepted guess produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum GuessResult {
    Hint { hint: GuessHint, attempts: u32 },
    Won { attempts: u32 },
    Lost { attempts: u32, target: i64 },
}

impl GuessResult {
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match *self {
            Self::Hint { .. } => None,
            Self::Won { attempts } => Some(Outcome::won(
                GameKind::NumberGuess,
                Metric::Attempts { attempts },
            )),
            Self::Lost { attempts, .. } => Some(Outcome::lost(
                GameKind::NumberGuess,
                Metric::Attempts { attempts },
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberGuessSession {
    min: i64,
    max: i64,
    max_attempts: u32,
    target: i64,
    attempts: u32,
    status: GuessStatus,
    last_hint: Option<GuessHint>,
    started_at: u64,
}

impl NumberGuessSession {
    /// Draw a fresh target in `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] unless `min < max`.
    pub fn start(
        min: i64,
        max: i64,
        max_attempts: u32,
        rng: &mut RandomSource,
        now: u64,
    ) -> Result<Self, GameError> {
        if min >= max {
            return Err(GameError::InvalidRange { min, max });
        }
        let target = rng.draw_int(min, max)?;
        log::debug!("number guess started in [{min}, {max}] with {max_attempts} attempts");
        Ok(Self::with_target(min, max, max_attempts, target, now))
    }

    /// Session with a known target, used when replaying or testing.
    #[must_use]
    pub fn with_target(min: i64, max: i64, max_attempts: u32, target: i64, now: u64) -> Self {
        Self {
            min,
            max,
            max_attempts: max_attempts.max(1),
            target: target.clamp(min, max),
            attempts: 0,
            status: GuessStatus::Active,
            last_hint: None,
            started_at: now,
        }
    }

    /// Submit a guess.
    ///
    /// # Errors
    ///
    /// [`GameError::SessionFinished`] once the round is over, and
    /// [`GameError::InvalidGuess`] for values outside the range. Rejected
    /// guesses do not consume an attempt.
    pub fn guess(&mut self, value: i64) -> Result<GuessResult, GameError> {
        if self.status != GuessStatus::Active {
            return Err(GameError::SessionFinished);
        }
        if !(self.min..=self.max).contains(&value) {
            return Err(GameError::InvalidGuess {
                min: self.min,
                max: self.max,
            });
        }

        self.attempts += 1;
        if value == self.target {
            self.status = GuessStatus::Won;
            self.last_hint = None;
            return Ok(GuessResult::Won {
                attempts: self.attempts,
            });
        }
        if self.attempts >= self.max_attempts {
            self.status = GuessStatus::Lost;
            self.last_hint = None;
            return Ok(GuessResult::Lost {
                attempts: self.attempts,
                target: self.target,
            });
        }

        let hint = if value > self.target {
            GuessHint::TooHigh
        } else {
            GuessHint::TooLow
        };
        self.last_hint = Some(hint);
        Ok(GuessResult::Hint {
            hint,
            attempts: self.attempts,
        })
    }

    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn status(&self) -> GuessStatus {
        self.status
    }

    #[must_use]
    pub const fn last_hint(&self) -> Option<GuessHint> {
        self.last_hint
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }

    /// The hidden number. Views only reveal it once the round is lost.
    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status != GuessStatus::Active
    }

    /// Terminal outcome, once there is one.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        let metric = Metric::Attempts {
            attempts: self.attempts,
        };
        match self.status {
            GuessStatus::Active => None,
            GuessStatus::Won => Some(Outcome::won(GameKind::NumberGuess, metric)),
            GuessStatus::Lost => Some(Outcome::lost(GameKind::NumberGuess, metric)),
        }
    }
}

/// Parse raw text input as a guess within `[min, max]`.
///
/// # Errors
///
/// Returns [`GameError::InvalidGuess`] for empty, fractional or non-numeric
/// text and for values outside the range.
pub fn parse_guess(text: &str, min: i64, max: i64) -> Result<i64, GameError> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| GameError::InvalidGuess { min, max })?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(GameError::InvalidGuess { min, max })
    }
}
