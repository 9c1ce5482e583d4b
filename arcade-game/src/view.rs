//! Render-ready snapshots and the events the controller emits.
//!
//! Renderers and cue players live outside the core; they consume [`Emit`]
//! values in order.
use serde::Serialize;

use crate::achievements::{Achievement, AchievementId, AchievementSet};
use crate::error::GameError;
use crate::games::GameSession;
use crate::games::blackjack::{BlackjackResult, BlackjackSession};
use crate::games::draw::SpinResult;
use crate::games::memory::{CardFace, MemorySession};
use crate::games::number_guess::{GuessHint, GuessStatus, NumberGuessSession};
use crate::games::odd_even::{OddEvenSession, RoundReport};
use crate::games::reaction::{ReactionPhase, ReactionSession};
use crate::numbers::percent;
use crate::outcome::{GameKind, MetricKey, Outcome};
use crate::settings::Settings;
use crate::stats::StatsLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Game(GameKind),
    Stats,
    Achievements,
    Settings,
}

/// Short audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Click,
    Success,
    Error,
    Flip,
    Match,
    Win,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessView {
    pub min: i64,
    pub max: i64,
    pub attempts: u32,
    pub remaining: u32,
    pub hint: Option<GuessHint>,
    pub status: GuessStatus,
    /// Only revealed once the round is lost.
    pub target: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    /// Hidden while the card is face down.
    pub symbol: Option<String>,
    pub face: CardFace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryView {
    pub cards: Vec<CardView>,
    pub moves: u32,
    pub matched_pairs: u32,
    pub pairs: u32,
    pub locked: bool,
    pub elapsed_ms: Option<u64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddEvenView {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub rounds: u32,
    pub last_round: Option<RoundReport>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionView {
    pub phase: ReactionPhase,
    pub last_ms: Option<u64>,
    pub best_ms: Option<u64>,
    pub average_ms: Option<f64>,
    pub samples: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlackjackView {
    pub player: Vec<u8>,
    pub player_total: u32,
    /// Dealer cards and total stay hidden until the round is settled.
    pub dealer: Option<Vec<u8>>,
    pub dealer_total: Option<u32>,
    pub result: Option<BlackjackResult>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawView {
    pub numbers: Vec<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinView {
    pub spin: Option<SpinResult>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatsRow {
    pub kind: GameKind,
    pub played: u32,
    pub wins: u32,
    pub bests: Vec<(MetricKey, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_games: u32,
    pub total_wins: u32,
    pub win_rate_percent: u8,
    pub current_streak: u32,
    pub best_streak: u32,
    pub per_game: Vec<GameStatsRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementsView {
    pub unlocked: Vec<Achievement>,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum ViewModel {
    NumberGuess(GuessView),
    Memory(MemoryView),
    OddEven(OddEvenView),
    Reaction(ReactionView),
    Blackjack(BlackjackView),
    NumberDraw(DrawView),
    Roulette(SpinView),
    Stats(StatsView),
    Achievements(AchievementsView),
    Settings(Settings),
}

impl ViewModel {
    /// Snapshot of a running session with an optional inline message.
    #[must_use]
    pub fn of_session(session: &GameSession, message: Option<String>) -> Self {
        match session {
            GameSession::NumberGuess(s) => Self::NumberGuess(guess_view(s, message)),
            GameSession::Memory(s) => Self::Memory(memory_view(s, message)),
            GameSession::OddEven(s) => Self::OddEven(odd_even_view(s, message)),
            GameSession::Reaction(s) => Self::Reaction(reaction_view(s, message)),
            GameSession::Blackjack(s) => Self::Blackjack(blackjack_view(s, message)),
        }
    }

    #[must_use]
    pub fn of_stats(ledger: &StatsLedger) -> Self {
        let per_game = GameKind::tracked()
            .map(|kind| {
                let record = ledger.game(kind).cloned().unwrap_or_default();
                GameStatsRow {
                    kind,
                    played: record.played,
                    wins: record.wins,
                    bests: record.bests.into_iter().collect(),
                }
            })
            .collect();
        Self::Stats(StatsView {
            total_games: ledger.total_games,
            total_wins: ledger.total_wins,
            win_rate_percent: percent(ledger.win_rate()),
            current_streak: ledger.current_streak,
            best_streak: ledger.best_streak,
            per_game,
        })
    }

    #[must_use]
    pub fn of_achievements(set: &AchievementSet) -> Self {
        Self::Achievements(AchievementsView {
            unlocked: set.as_slice().to_vec(),
            available: AchievementId::ALL.len(),
        })
    }

    /// The inline message, if the view carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Self::NumberGuess(v) => &v.message,
            Self::Memory(v) => &v.message,
            Self::OddEven(v) => &v.message,
            Self::Reaction(v) => &v.message,
            Self::Blackjack(v) => &v.message,
            Self::NumberDraw(v) => &v.message,
            Self::Roulette(v) => &v.message,
            Self::Stats(_) | Self::Achievements(_) | Self::Settings(_) => return None,
        };
        message.as_deref()
    }
}

fn guess_view(session: &NumberGuessSession, message: Option<String>) -> GuessView {
    GuessView {
        min: session.min(),
        max: session.max(),
        attempts: session.attempts(),
        remaining: session.max_attempts().saturating_sub(session.attempts()),
        hint: session.last_hint(),
        status: session.status(),
        target: (session.status() == GuessStatus::Lost).then(|| session.target()),
        message,
    }
}

fn memory_view(session: &MemorySession, message: Option<String>) -> MemoryView {
    let cards = session
        .cards()
        .iter()
        .map(|card| CardView {
            symbol: (card.face != CardFace::FaceDown).then(|| card.symbol.clone()),
            face: card.face,
        })
        .collect();
    MemoryView {
        cards,
        moves: session.moves(),
        matched_pairs: session.matched_pairs(),
        pairs: session.pairs(),
        locked: session.locked(),
        elapsed_ms: session.elapsed_ms(),
        message,
    }
}

fn odd_even_view(session: &OddEvenSession, message: Option<String>) -> OddEvenView {
    OddEvenView {
        score: session.score(),
        streak: session.streak(),
        best_streak: session.best_streak(),
        rounds: session.rounds(),
        last_round: session.last_round().copied(),
        message,
    }
}

fn reaction_view(session: &ReactionSession, message: Option<String>) -> ReactionView {
    ReactionView {
        phase: session.phase(),
        last_ms: session.last_ms(),
        best_ms: session.best_ms(),
        average_ms: session.average_ms(),
        samples: session.history().len(),
        message,
    }
}

fn blackjack_view(session: &BlackjackSession, message: Option<String>) -> BlackjackView {
    BlackjackView {
        player: session.player().to_vec(),
        player_total: session.player_total(),
        dealer: session.dealer_visible().map(<[u8]>::to_vec),
        dealer_total: session.is_finished().then(|| session.dealer_total()),
        result: session.result(),
        message,
    }
}

/// Everything the controller asks its host to do, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "emit")]
pub enum Emit {
    Render { screen: Screen, view: ViewModel },
    Cue { cue: Cue },
    Unlocked { achievement: Achievement },
    Rejected { error: GameError },
    Recorded { outcome: Outcome },
}

impl Emit {
    /// First rejection in a batch of emits.
    #[must_use]
    pub fn rejection(emits: &[Self]) -> Option<&GameError> {
        emits.iter().find_map(|emit| match emit {
            Self::Rejected { error } => Some(error),
            _ => None,
        })
    }

    /// Last rendered view in a batch of emits.
    #[must_use]
    pub fn last_view(emits: &[Self]) -> Option<&ViewModel> {
        emits.iter().rev().find_map(|emit| match emit {
            Self::Render { view, .. } => Some(view),
            _ => None,
        })
    }

    /// Cues in a batch of emits.
    #[must_use]
    pub fn cues(emits: &[Self]) -> Vec<Cue> {
        emits
            .iter()
            .filter_map(|emit| match emit {
                Self::Cue { cue } => Some(*cue),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlackjackCfg;

    #[test]
    fn face_down_symbols_are_hidden() {
        let deck = ["A", "A"].map(String::from).to_vec();
        let mut session = MemorySession::from_deck(deck, 1_000, 0);
        let _ = session.flip(1, 0).unwrap();
        let ViewModel::Memory(view) = ViewModel::of_session(&GameSession::Memory(session), None)
        else {
            panic!("expected memory view");
        };
        assert_eq!(view.cards[0].symbol, None);
        assert_eq!(view.cards[1].symbol.as_deref(), Some("A"));
    }

    #[test]
    fn dealer_hand_hidden_until_settled() {
        let session = BlackjackSession::from_hands(&BlackjackCfg::default(), &[10, 5], &[9, 9], 0);
        let ViewModel::Blackjack(view) =
            ViewModel::of_session(&GameSession::Blackjack(session), None)
        else {
            panic!("expected blackjack view");
        };
        assert_eq!(view.player_total, 15);
        assert!(view.dealer.is_none());
        assert!(view.dealer_total.is_none());
    }

    #[test]
    fn lost_guess_reveals_target_only_then() {
        let mut session = NumberGuessSession::with_target(1, 10, 1, 4, 0);
        let active = ViewModel::of_session(&GameSession::NumberGuess(session.clone()), None);
        assert!(matches!(active, ViewModel::NumberGuess(GuessView { target: None, .. })));
        let _ = session.guess(9).unwrap();
        let lost = ViewModel::of_session(
            &GameSession::NumberGuess(session),
            Some("out of attempts".into()),
        );
        assert!(matches!(lost, ViewModel::NumberGuess(GuessView { target: Some(4), .. })));
        assert_eq!(lost.message(), Some("out of attempts"));
    }

    #[test]
    fn stats_view_lists_tracked_games_only() {
        let ViewModel::Stats(view) = ViewModel::of_stats(&StatsLedger::default()) else {
            panic!("expected stats view");
        };
        let kinds: Vec<_> = view.per_game.iter().map(|row| row.kind).collect();
        assert_eq!(
            kinds,
            [
                GameKind::NumberGuess,
                GameKind::Memory,
                GameKind::OddEven,
                GameKind::Reaction
            ]
        );
        assert_eq!(view.win_rate_percent, 0);
    }
}
