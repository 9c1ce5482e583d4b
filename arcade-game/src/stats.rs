//! Cross-game counters and per-game bests.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::numbers::ratio;
use crate::outcome::{GameKind, MetricKey, Outcome};

/// Per-game counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub wins: u32,
    /// Best value seen per metric, updated on wins only.
    #[serde(default)]
    pub bests: BTreeMap<MetricKey, u64>,
}

impl GameRecord {
    #[must_use]
    pub fn best(&self, key: MetricKey) -> Option<u64> {
        self.bests.get(&key).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsLedger {
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_wins: u32,
    /// Consecutive wins ending at the latest record, across all games.
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub per_game: BTreeMap<GameKind, GameRecord>,
}

impl StatsLedger {
    /// Fold an outcome into the ledger and return the bests it improved.
    ///
    /// Untracked games are ignored.
    pub fn record(&mut self, outcome: &Outcome) -> Vec<(MetricKey, u64)> {
        if !outcome.kind.is_tracked() {
            log::warn!("ignoring outcome for untracked game {}", outcome.kind);
            return Vec::new();
        }

        self.total_games = self.total_games.saturating_add(1);
        let record = self.per_game.entry(outcome.kind).or_default();
        record.played = record.played.saturating_add(1);

        if !outcome.won {
            self.current_streak = 0;
            return Vec::new();
        }

        self.total_wins = self.total_wins.saturating_add(1);
        self.current_streak = self.current_streak.saturating_add(1);
        self.best_streak = self.best_streak.max(self.current_streak);
        record.wins = record.wins.saturating_add(1);

        let mut improved = Vec::new();
        for (key, value) in outcome.metric.scores() {
            if key.direction().improves(record.best(key), value) {
                record.bests.insert(key, value);
                improved.push((key, value));
            }
        }
        if !improved.is_empty() {
            log::info!("new {} bests: {improved:?}", outcome.kind);
        }
        improved
    }

    #[must_use]
    pub fn game(&self, kind: GameKind) -> Option<&GameRecord> {
        self.per_game.get(&kind)
    }

    #[must_use]
    pub fn best(&self, kind: GameKind, key: MetricKey) -> Option<u64> {
        self.game(kind).and_then(|record| record.best(key))
    }

    #[must_use]
    pub fn has_won(&self, kind: GameKind) -> bool {
        self.game(kind).is_some_and(|record| record.wins > 0)
    }

    /// Fraction of recorded games that were won.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        ratio(self.total_wins, self.total_games)
    }
}
