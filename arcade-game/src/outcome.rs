//! Game kinds and the terminal results they emit.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Every game offered by the arcade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    NumberGuess,
    Memory,
    OddEven,
    Reaction,
    Blackjack,
    NumberDraw,
    Roulette,
}

impl GameKind {
    pub const ALL: [Self; 7] = [
        Self::NumberGuess,
        Self::Memory,
        Self::OddEven,
        Self::Reaction,
        Self::Blackjack,
        Self::NumberDraw,
        Self::Roulette,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NumberGuess => "number_guess",
            Self::Memory => "memory",
            Self::OddEven => "odd_even",
            Self::Reaction => "reaction",
            Self::Blackjack => "blackjack",
            Self::NumberDraw => "number_draw",
            Self::Roulette => "roulette",
        }
    }

    /// Whether outcomes of this game feed the ledger and achievements.
    ///
    /// Blackjack rounds are played for fun only; the draw and spin tools
    /// have no outcome at all.
    #[must_use]
    pub const fn is_tracked(self) -> bool {
        matches!(
            self,
            Self::NumberGuess | Self::Memory | Self::OddEven | Self::Reaction
        )
    }

    /// Whether the game is a long-lived session rather than a one-shot tool.
    #[must_use]
    pub const fn has_session(self) -> bool {
        !matches!(self, Self::NumberDraw | Self::Roulette)
    }

    /// Tracked games, in catalog order.
    pub fn tracked() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|kind| kind.is_tracked())
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    LowerIsBetter,
    HigherIsBetter,
}

impl MetricDirection {
    /// True when `candidate` beats the current best (or there is none yet).
    #[must_use]
    pub fn improves(self, current: Option<u64>, candidate: u64) -> bool {
        match (self, current) {
            (_, None) => true,
            (Self::LowerIsBetter, Some(best)) => candidate < best,
            (Self::HigherIsBetter, Some(best)) => candidate > best,
        }
    }
}

/// Name of a per-game best tracked in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Attempts,
    Moves,
    TimeMs,
    Streak,
    ReactionMs,
}

impl MetricKey {
    #[must_use]
    pub const fn direction(self) -> MetricDirection {
        match self {
            Self::Streak => MetricDirection::HigherIsBetter,
            Self::Attempts | Self::Moves | Self::TimeMs | Self::ReactionMs => {
                MetricDirection::LowerIsBetter
            }
        }
    }
}

/// Measurement attached to an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Metric {
    Attempts { attempts: u32 },
    MovesAndTime { moves: u32, elapsed_ms: u64 },
    Streak { streak: u32 },
    ReactionMs { ms: u64 },
}

impl Metric {
    /// Flatten the metric into `(key, value)` pairs for best tracking.
    #[must_use]
    pub fn scores(&self) -> SmallVec<[(MetricKey, u64); 2]> {
        let mut scores = SmallVec::new();
        match *self {
            Self::Attempts { attempts } => scores.push((MetricKey::Attempts, u64::from(attempts))),
            Self::MovesAndTime { moves, elapsed_ms } => {
                scores.push((MetricKey::Moves, u64::from(moves)));
                scores.push((MetricKey::TimeMs, elapsed_ms));
            }
            Self::Streak { streak } => scores.push((MetricKey::Streak, u64::from(streak))),
            Self::ReactionMs { ms } => scores.push((MetricKey::ReactionMs, ms)),
        }
        scores
    }
}

/// Immutable terminal result of a session (or of one odd/even round).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: GameKind,
    pub won: bool,
    pub metric: Metric,
}

impl Outcome {
    #[must_use]
    pub const fn won(kind: GameKind, metric: Metric) -> Self {
        Self {
            kind,
            won: true,
            metric,
        }
    }

    #[must_use]
    pub const fn lost(kind: GameKind, metric: Metric) -> Self {
        Self {
            kind,
            won: false,
            metric,
        }
    }
}
