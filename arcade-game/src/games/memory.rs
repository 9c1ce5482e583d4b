//! Matching pairs: every symbol appears exactly twice in a shuffled deck.
//!
//! A mismatched pair stays visible in an explicit `PendingResolve` phase
//! until the host fires the revert timer; new flips are ignored meanwhile.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MEMORY_COPIES_PER_SYMBOL;
use crate::error::GameError;
use crate::outcome::{GameKind, Metric, Outcome};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    FaceDown,
    FaceUp,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: String,
    pub face: CardFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum MemoryPhase {
    Playing,
    PendingResolve { first: usize, second: usize },
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum FlipResult {
    /// Locked, already face up, or already matched.
    Ignored,
    Revealed { index: usize },
    Matched { first: usize, second: usize },
    Mismatch { first: usize, second: usize },
    Won { moves: u32, elapsed_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySession {
    cards: Vec<Card>,
    pairs: u32,
    matched_pairs: u32,
    moves: u32,
    pending: SmallVec<[usize; 2]>,
    phase: MemoryPhase,
    revert_delay_ms: u64,
    started_at: u64,
    first_flip_at: Option<u64>,
    elapsed_ms: Option<u64>,
}

impl MemorySession {
    /// Deal a shuffled deck holding two copies of every symbol.
    #[must_use]
    pub fn start(
        symbols: &[String],
        revert_delay_ms: u64,
        rng: &mut RandomSource,
        now: u64,
    ) -> Self {
        let expanded: Vec<String> = symbols
            .iter()
            .flat_map(|symbol| std::iter::repeat_n(symbol.clone(), MEMORY_COPIES_PER_SYMBOL))
            .collect();
        let deck = rng.shuffle(&expanded);
        log::debug!("memory deck dealt with {} cards", deck.len());
        Self::from_deck(deck, revert_delay_ms, now)
    }

    /// Session over a fixed card order. Each symbol is expected to appear
    /// exactly twice.
    #[must_use]
    pub fn from_deck(deck: Vec<String>, revert_delay_ms: u64, now: u64) -> Self {
        let pairs = u32::try_from(deck.len() / MEMORY_COPIES_PER_SYMBOL).unwrap_or(u32::MAX);
        let cards = deck
            .into_iter()
            .map(|symbol| Card {
                symbol,
                face: CardFace::FaceDown,
            })
            .collect();
        Self {
            cards,
            pairs,
            matched_pairs: 0,
            moves: 0,
            pending: SmallVec::new(),
            phase: MemoryPhase::Playing,
            revert_delay_ms,
            started_at: now,
            first_flip_at: None,
            elapsed_ms: None,
        }
    }

    /// Reveal the card at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidGuess`] when `index` is not on the table.
    pub fn flip(&mut self, index: usize, now: u64) -> Result<FlipResult, GameError> {
        let Some(card) = self.cards.get(index) else {
            let last = i64::try_from(self.cards.len()).unwrap_or(i64::MAX) - 1;
            return Err(GameError::InvalidGuess { min: 0, max: last });
        };
        if self.phase != MemoryPhase::Playing || card.face != CardFace::FaceDown {
            return Ok(FlipResult::Ignored);
        }

        if self.first_flip_at.is_none() {
            self.first_flip_at = Some(now);
        }
        self.cards[index].face = CardFace::FaceUp;
        self.pending.push(index);
        if self.pending.len() < 2 {
            return Ok(FlipResult::Revealed { index });
        }

        let (first, second) = (self.pending[0], self.pending[1]);
        self.pending.clear();
        self.moves += 1;

        if self.cards[first].symbol != self.cards[second].symbol {
            self.phase = MemoryPhase::PendingResolve { first, second };
            return Ok(FlipResult::Mismatch { first, second });
        }

        self.cards[first].face = CardFace::Matched;
        self.cards[second].face = CardFace::Matched;
        self.matched_pairs += 1;
        if self.matched_pairs < self.pairs {
            return Ok(FlipResult::Matched { first, second });
        }

        let elapsed_ms = now.saturating_sub(self.first_flip_at.unwrap_or(now));
        self.phase = MemoryPhase::Won;
        self.elapsed_ms = Some(elapsed_ms);
        Ok(FlipResult::Won {
            moves: self.moves,
            elapsed_ms,
        })
    }

    /// Turn a pending mismatched pair face down again and unlock the table.
    /// Returns the pair that was reverted, if any.
    pub fn resolve_pending(&mut self) -> Option<(usize, usize)> {
        let MemoryPhase::PendingResolve { first, second } = self.phase else {
            return None;
        };
        self.cards[first].face = CardFace::FaceDown;
        self.cards[second].face = CardFace::FaceDown;
        self.phase = MemoryPhase::Playing;
        Some((first, second))
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub const fn pairs(&self) -> u32 {
        self.pairs
    }

    #[must_use]
    pub const fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub const fn phase(&self) -> MemoryPhase {
        self.phase
    }

    #[must_use]
    pub const fn locked(&self) -> bool {
        matches!(self.phase, MemoryPhase::PendingResolve { .. })
    }

    #[must_use]
    pub const fn revert_delay_ms(&self) -> u64 {
        self.revert_delay_ms
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }

    /// Time from the first flip to the win, once won.
    #[must_use]
    pub const fn elapsed_ms(&self) -> Option<u64> {
        self.elapsed_ms
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.phase, MemoryPhase::Won)
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.elapsed_ms {
            Some(elapsed_ms) if self.is_terminal() => Some(Outcome::won(
                GameKind::Memory,
                Metric::MovesAndTime {
                    moves: self.moves,
                    elapsed_ms,
                },
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matching_pair_stays_up() {
        let mut session = MemorySession::from_deck(deck(&["A", "A", "B", "B"]), 1_000, 0);
        assert_eq!(session.flip(0, 10), Ok(FlipResult::Revealed { index: 0 }));
        assert_eq!(
            session.flip(1, 20),
            Ok(FlipResult::Matched {
                first: 0,
                second: 1
            })
        );
        assert_eq!(session.matched_pairs(), 1);
        assert_eq!(session.moves(), 1);
        assert_eq!(session.cards()[0].face, CardFace::Matched);
    }

    #[test]
    fn mismatch_locks_until_resolved() {
        let mut session = MemorySession::from_deck(deck(&["A", "B", "A", "B"]), 1_000, 0);
        let _ = session.flip(0, 0).unwrap();
        assert_eq!(
            session.flip(1, 0),
            Ok(FlipResult::Mismatch {
                first: 0,
                second: 1
            })
        );
        assert!(session.locked());
        assert_eq!(session.flip(2, 0), Ok(FlipResult::Ignored));
        assert_eq!(session.cards()[2].face, CardFace::FaceDown);

        assert_eq!(session.resolve_pending(), Some((0, 1)));
        assert!(!session.locked());
        assert_eq!(session.cards()[0].face, CardFace::FaceDown);
        assert_eq!(session.resolve_pending(), None);
    }

    #[test]
    fn reflipping_a_face_up_card_is_ignored() {
        let mut session = MemorySession::from_deck(deck(&["A", "B", "A", "B"]), 1_000, 0);
        let _ = session.flip(0, 0).unwrap();
        assert_eq!(session.flip(0, 0), Ok(FlipResult::Ignored));
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut session = MemorySession::from_deck(deck(&["A", "A"]), 1_000, 0);
        assert_eq!(
            session.flip(9, 0),
            Err(GameError::InvalidGuess { min: 0, max: 1 })
        );
    }

    #[test]
    fn win_reports_moves_and_time_from_first_flip() {
        let mut session = MemorySession::from_deck(deck(&["A", "B", "A", "B"]), 1_000, 0);
        let _ = session.flip(0, 5_000).unwrap();
        let _ = session.flip(1, 5_500).unwrap();
        let _ = session.resolve_pending();
        let _ = session.flip(0, 7_000).unwrap();
        let _ = session.flip(2, 7_500).unwrap();
        let _ = session.flip(1, 8_000).unwrap();
        assert_eq!(
            session.flip(3, 9_000),
            Ok(FlipResult::Won {
                moves: 3,
                elapsed_ms: 4_000
            })
        );
        assert!(session.is_terminal());
        assert_eq!(
            session.outcome(),
            Some(Outcome::won(
                GameKind::Memory,
                Metric::MovesAndTime {
                    moves: 3,
                    elapsed_ms: 4_000
                }
            ))
        );
    }

    #[test]
    fn dealt_deck_holds_each_symbol_twice() {
        let symbols = deck(&["A", "B", "C", "D"]);
        let mut rng = RandomSource::from_seed(11);
        let session = MemorySession::start(&symbols, 1_000, &mut rng, 0);
        assert_eq!(session.cards().len(), 8);
        assert_eq!(session.pairs(), 4);
        for symbol in &symbols {
            let copies = session
                .cards()
                .iter()
                .filter(|card| &card.symbol == symbol)
                .count();
            assert_eq!(copies, 2);
        }
    }
}
