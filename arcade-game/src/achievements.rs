//! Achievement catalog and unlock evaluation.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{
    ACH_HOT_STREAK, ACH_LIGHTNING_MS, ACH_MEMORY_SPRINT_MS, ACH_PARITY_STREAK,
    ACH_REGULAR_GAMES, ACH_SHARP_GUESS_ATTEMPTS, ACH_UNSTOPPABLE_STREAK, ACH_VETERAN_GAMES,
};
use crate::outcome::{GameKind, Metric, Outcome};
use crate::stats::StatsLedger;

/// Every achievement the arcade can award, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    FirstWin,
    Regular,
    Veteran,
    HotStreak,
    Unstoppable,
    SharpGuesser,
    LuckyShot,
    Photographic,
    MemorySprinter,
    ParityPro,
    Lightning,
    AllRounder,
}

impl AchievementId {
    pub const ALL: &'static [Self] = &[
        Self::FirstWin,
        Self::Regular,
        Self::Veteran,
        Self::HotStreak,
        Self::Unstoppable,
        Self::SharpGuesser,
        Self::LuckyShot,
        Self::Photographic,
        Self::MemorySprinter,
        Self::ParityPro,
        Self::Lightning,
        Self::AllRounder,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstWin => "first_win",
            Self::Regular => "regular",
            Self::Veteran => "veteran",
            Self::HotStreak => "hot_streak",
            Self::Unstoppable => "unstoppable",
            Self::SharpGuesser => "sharp_guesser",
            Self::LuckyShot => "lucky_shot",
            Self::Photographic => "photographic",
            Self::MemorySprinter => "memory_sprinter",
            Self::ParityPro => "parity_pro",
            Self::Lightning => "lightning",
            Self::AllRounder => "all_rounder",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstWin => "First Win",
            Self::Regular => "Regular",
            Self::Veteran => "Veteran",
            Self::HotStreak => "Hot Streak",
            Self::Unstoppable => "Unstoppable",
            Self::SharpGuesser => "Sharp Guesser",
            Self::LuckyShot => "Lucky Shot",
            Self::Photographic => "Photographic Memory",
            Self::MemorySprinter => "Memory Sprinter",
            Self::ParityPro => "Parity Pro",
            Self::Lightning => "Lightning Reflexes",
            Self::AllRounder => "All-Rounder",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstWin => "Win any game.",
            Self::Regular => "Finish 10 games.",
            Self::Veteran => "Finish 50 games.",
            Self::HotStreak => "Win 3 games in a row.",
            Self::Unstoppable => "Win 10 games in a row.",
            Self::SharpGuesser => "Find the hidden number in 3 attempts or fewer.",
            Self::LuckyShot => "Find the hidden number on the first attempt.",
            Self::Photographic => "Clear the memory board without a single mismatch.",
            Self::MemorySprinter => "Clear the memory board in under 30 seconds.",
            Self::ParityPro => "Call odd or even correctly 5 times in a row.",
            Self::Lightning => "React in under 250 ms.",
            Self::AllRounder => "Win every tracked game at least once.",
        }
    }

    /// Whether the rule holds for the outcome just recorded into the ledger.
    #[must_use]
    pub fn is_satisfied(self, input: &RuleInput<'_>) -> bool {
        let RuleInput {
            outcome,
            ledger,
            memory_pairs,
        } = *input;
        let won = outcome.won;
        match (self, outcome.metric) {
            (Self::FirstWin, _) => won,
            (Self::Regular, _) => ledger.total_games >= ACH_REGULAR_GAMES,
            (Self::Veteran, _) => ledger.total_games >= ACH_VETERAN_GAMES,
            (Self::HotStreak, _) => ledger.current_streak >= ACH_HOT_STREAK,
            (Self::Unstoppable, _) => ledger.current_streak >= ACH_UNSTOPPABLE_STREAK,
            (Self::SharpGuesser, Metric::Attempts { attempts }) => {
                won && attempts <= ACH_SHARP_GUESS_ATTEMPTS
            }
            (Self::LuckyShot, Metric::Attempts { attempts }) => won && attempts == 1,
            (Self::Photographic, Metric::MovesAndTime { moves, .. }) => {
                won && memory_pairs == Some(moves)
            }
            (Self::MemorySprinter, Metric::MovesAndTime { elapsed_ms, .. }) => {
                won && elapsed_ms < ACH_MEMORY_SPRINT_MS
            }
            (Self::ParityPro, Metric::Streak { streak }) => won && streak >= ACH_PARITY_STREAK,
            (Self::Lightning, Metric::ReactionMs { ms }) => won && ms < ACH_LIGHTNING_MS,
            (Self::AllRounder, _) => GameKind::tracked().all(|kind| ledger.has_won(kind)),
            _ => false,
        }
    }
}

/// What a rule sees: the outcome and the ledger after recording it.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub outcome: &'a Outcome,
    pub ledger: &'a StatsLedger,
    /// Board size of a finished memory game; a perfect game takes one move
    /// per pair.
    pub memory_pairs: Option<u32>,
}

impl<'a> RuleInput<'a> {
    #[must_use]
    pub const fn new(outcome: &'a Outcome, ledger: &'a StatsLedger) -> Self {
        Self {
            outcome,
            ledger,
            memory_pairs: None,
        }
    }

    #[must_use]
    pub const fn with_memory_pairs(mut self, pairs: u32) -> Self {
        self.memory_pairs = Some(pairs);
        self
    }
}

/// An unlocked achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Clock time of the unlock, in milliseconds.
    pub unlocked_at: u64,
}

impl Achievement {
    #[must_use]
    pub fn unlock(id: AchievementId, now: u64) -> Self {
        Self {
            id: id.key().to_string(),
            title: id.title().to_string(),
            description: id.description().to_string(),
            unlocked_at: now,
        }
    }
}

/// Append-only unlock list with set-keyed membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Achievement>", into = "Vec<Achievement>")]
pub struct AchievementSet {
    unlocked: Vec<Achievement>,
    ids: HashSet<String>,
}

impl AchievementSet {
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add an achievement unless its id is already present. Returns whether
    /// it was added.
    pub fn insert(&mut self, achievement: Achievement) -> bool {
        if !self.ids.insert(achievement.id.clone()) {
            return false;
        }
        self.unlocked.push(achievement);
        true
    }

    /// Unlocks in the order they happened.
    #[must_use]
    pub fn as_slice(&self) -> &[Achievement] {
        &self.unlocked
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

impl From<Vec<Achievement>> for AchievementSet {
    fn from(list: Vec<Achievement>) -> Self {
        let mut set = Self::default();
        for achievement in list {
            let id = achievement.id.clone();
            if !set.insert(achievement) {
                log::warn!("dropping duplicate persisted achievement {id}");
            }
        }
        set
    }
}

impl From<AchievementSet> for Vec<Achievement> {
    fn from(set: AchievementSet) -> Self {
        set.unlocked
    }
}

/// Stateless rule evaluator over the fixed catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementEngine;

impl AchievementEngine {
    /// Achievements newly satisfied by `input`, in catalog order. Ids already
    /// in `unlocked` never fire again.
    #[must_use]
    pub fn evaluate(
        input: &RuleInput<'_>,
        unlocked: &AchievementSet,
        now: u64,
    ) -> Vec<Achievement> {
        AchievementId::ALL
            .iter()
            .copied()
            .filter(|id| !unlocked.contains(id.key()))
            .filter(|id| id.is_satisfied(input))
            .map(|id| Achievement::unlock(id, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(unlocked: &[Achievement]) -> Vec<&str> {
        unlocked.iter().map(|a| a.id.as_str()).collect()
    }

    fn record(ledger: &mut StatsLedger, outcome: Outcome) -> Outcome {
        let _ = ledger.record(&outcome);
        outcome
    }

    #[test]
    fn first_win_and_sharp_guess_fire_together() {
        let mut ledger = StatsLedger::default();
        let outcome = record(
            &mut ledger,
            Outcome::won(GameKind::NumberGuess, Metric::Attempts { attempts: 1 }),
        );
        let fired = AchievementEngine::evaluate(
            &RuleInput::new(&outcome, &ledger),
            &AchievementSet::default(),
            500,
        );
        assert_eq!(keys(&fired), ["first_win", "sharp_guesser", "lucky_shot"]);
        assert!(fired.iter().all(|a| a.unlocked_at == 500));
    }

    #[test]
    fn unlocked_ids_never_fire_again() {
        let mut ledger = StatsLedger::default();
        let mut set = AchievementSet::default();
        for _ in 0..2 {
            let outcome = record(
                &mut ledger,
                Outcome::won(GameKind::NumberGuess, Metric::Attempts { attempts: 7 }),
            );
            let input = RuleInput::new(&outcome, &ledger);
            for achievement in AchievementEngine::evaluate(&input, &set, 0) {
                assert!(set.insert(achievement));
            }
        }
        assert_eq!(keys(set.as_slice()), ["first_win"]);
    }

    #[test]
    fn losses_only_unlock_volume_rules() {
        let mut ledger = StatsLedger::default();
        let mut fired = Vec::new();
        for _ in 0..10 {
            let outcome = record(
                &mut ledger,
                Outcome::lost(GameKind::NumberGuess, Metric::Attempts { attempts: 10 }),
            );
            fired = AchievementEngine::evaluate(
                &RuleInput::new(&outcome, &ledger),
                &AchievementSet::default(),
                0,
            );
        }
        assert_eq!(keys(&fired), ["regular"]);
    }

    #[test]
    fn perfect_memory_needs_board_size() {
        let mut ledger = StatsLedger::default();
        let outcome = record(
            &mut ledger,
            Outcome::won(
                GameKind::Memory,
                Metric::MovesAndTime {
                    moves: 8,
                    elapsed_ms: 45_000,
                },
            ),
        );
        let set = AchievementSet::default();
        let without = AchievementEngine::evaluate(&RuleInput::new(&outcome, &ledger), &set, 0);
        assert!(!keys(&without).contains(&"photographic"));
        let with = AchievementEngine::evaluate(
            &RuleInput::new(&outcome, &ledger).with_memory_pairs(8),
            &set,
            0,
        );
        assert!(keys(&with).contains(&"photographic"));
        assert!(!keys(&with).contains(&"memory_sprinter"));
    }

    #[test]
    fn all_rounder_requires_every_tracked_win() {
        let mut ledger = StatsLedger::default();
        let outcomes = [
            Outcome::won(GameKind::NumberGuess, Metric::Attempts { attempts: 6 }),
            Outcome::won(
                GameKind::Memory,
                Metric::MovesAndTime {
                    moves: 20,
                    elapsed_ms: 90_000,
                },
            ),
            Outcome::won(GameKind::OddEven, Metric::Streak { streak: 1 }),
            Outcome::won(GameKind::Reaction, Metric::ReactionMs { ms: 240 }),
        ];
        let mut set = AchievementSet::default();
        for outcome in outcomes {
            let outcome = record(&mut ledger, outcome);
            let input = RuleInput::new(&outcome, &ledger);
            for achievement in AchievementEngine::evaluate(&input, &set, 0) {
                let _ = set.insert(achievement);
            }
        }
        assert!(set.contains("all_rounder"));
        assert!(set.contains("lightning"));
        assert!(set.contains("hot_streak"));
        assert!(!set.contains("parity_pro"));
    }

    #[test]
    fn persisted_list_drops_duplicates() {
        let json = r#"[
            {"id": "first_win", "title": "First Win", "description": "", "unlocked_at": 1},
            {"id": "first_win", "title": "First Win", "description": "", "unlocked_at": 2}
        ]"#;
        let set: AchievementSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].unlocked_at, 1);
        let back = serde_json::to_value(&set).unwrap();
        assert!(back.is_array());
    }
}
