//! Recoverable errors raised by game operations.
//!
//! None of these are fatal: a rejected operation leaves the session exactly
//! as it was, and the controller turns the error into an inline message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outcome::GameKind;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error")]
pub enum GameError {
    #[error("invalid range: {min} must be lower than {max}")]
    InvalidRange { min: i64, max: i64 },
    #[error("range bounds must be whole numbers (got {input:?})")]
    NonNumericBound { input: String },
    #[error("guess must be a whole number between {min} and {max}")]
    InvalidGuess { min: i64, max: i64 },
    #[error("cannot draw {count} distinct numbers from {available} available")]
    InvalidCount { count: i64, available: i64 },
    #[error("the round is over; start a new one")]
    SessionFinished,
    #[error("no game is running")]
    NoActiveSession,
    #[error("{kind} does not accept that input")]
    UnsupportedInput { kind: GameKind },
}

impl GameError {
    /// Whether this error belongs to the range family (`InvalidRange` in the
    /// user-facing taxonomy, which also covers non-numeric bounds).
    #[must_use]
    pub const fn is_range_error(&self) -> bool {
        matches!(self, Self::InvalidRange { .. } | Self::NonNumericBound { .. })
    }
}
