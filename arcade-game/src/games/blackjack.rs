//! Simplified twenty-one: card values only, drawn from an endless deck.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::BlackjackCfg;
use crate::constants::BLACKJACK_OPENING_CARDS;
use crate::error::GameError;
use crate::rng::RandomSource;

pub type Hand = SmallVec<[u8; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackResult {
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Draw,
}

impl BlackjackResult {
    #[must_use]
    pub const fn player_won(self) -> bool {
        matches!(self, Self::DealerBust | Self::PlayerWins)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum HitResult {
    Drew { card: u8, total: u32 },
    Bust { card: u8, total: u32 },
}

#[must_use]
pub fn hand_total(hand: &[u8]) -> u32 {
    hand.iter().map(|&card| u32::from(card)).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackSession {
    player: Hand,
    dealer: Hand,
    result: Option<BlackjackResult>,
    cfg: BlackjackCfg,
    started_at: u64,
}

impl BlackjackSession {
    /// Deal two cards to each side. An opening hand already over the target
    /// ends the round on the spot.
    #[must_use]
    pub fn deal(cfg: &BlackjackCfg, rng: &mut RandomSource, now: u64) -> Self {
        let mut session = Self {
            player: Hand::new(),
            dealer: Hand::new(),
            result: None,
            cfg: cfg.clone(),
            started_at: now,
        };
        for _ in 0..BLACKJACK_OPENING_CARDS {
            let card = session.draw_card(rng);
            session.player.push(card);
            let card = session.draw_card(rng);
            session.dealer.push(card);
        }
        session.check_opening_bust();
        session
    }

    /// Session over fixed hands, for replays and tests.
    #[must_use]
    pub fn from_hands(cfg: &BlackjackCfg, player: &[u8], dealer: &[u8], now: u64) -> Self {
        let mut session = Self {
            player: player.iter().copied().collect(),
            dealer: dealer.iter().copied().collect(),
            result: None,
            cfg: cfg.clone(),
            started_at: now,
        };
        session.check_opening_bust();
        session
    }

    fn check_opening_bust(&mut self) {
        if self.player_total() > self.cfg.target {
            self.result = Some(BlackjackResult::PlayerBust);
        }
    }

    fn draw_card(&self, rng: &mut RandomSource) -> u8 {
        rng.draw_int(i64::from(self.cfg.card_min), i64::from(self.cfg.card_max))
            .ok()
            .and_then(|card| u8::try_from(card).ok())
            .unwrap_or(self.cfg.card_min)
    }

    /// Take another card.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionFinished`] once the round is settled.
    pub fn hit(&mut self, rng: &mut RandomSource) -> Result<HitResult, GameError> {
        if self.is_finished() {
            return Err(GameError::SessionFinished);
        }
        let card = self.draw_card(rng);
        self.player.push(card);
        let total = self.player_total();
        if total > self.cfg.target {
            self.result = Some(BlackjackResult::PlayerBust);
            return Ok(HitResult::Bust { card, total });
        }
        Ok(HitResult::Drew { card, total })
    }

    /// End the player's turn; the dealer draws up to its stand threshold.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionFinished`] once the round is settled.
    pub fn stand(&mut self, rng: &mut RandomSource) -> Result<BlackjackResult, GameError> {
        if self.is_finished() {
            return Err(GameError::SessionFinished);
        }
        while self.dealer_total() < self.cfg.dealer_stand {
            let card = self.draw_card(rng);
            self.dealer.push(card);
        }
        let result = self.settle();
        self.result = Some(result);
        Ok(result)
    }

    fn settle(&self) -> BlackjackResult {
        let player = self.player_total();
        let dealer = self.dealer_total();
        if dealer > self.cfg.target {
            BlackjackResult::DealerBust
        } else if player > dealer {
            BlackjackResult::PlayerWins
        } else if player == dealer {
            BlackjackResult::Draw
        } else {
            BlackjackResult::DealerWins
        }
    }

    #[must_use]
    pub fn player(&self) -> &[u8] {
        &self.player
    }

    /// Dealer cards, hidden until the round is settled.
    #[must_use]
    pub fn dealer_visible(&self) -> Option<&[u8]> {
        self.is_finished().then_some(self.dealer.as_slice())
    }

    #[must_use]
    pub fn dealer(&self) -> &[u8] {
        &self.dealer
    }

    #[must_use]
    pub fn player_total(&self) -> u32 {
        hand_total(&self.player)
    }

    #[must_use]
    pub fn dealer_total(&self) -> u32 {
        hand_total(&self.dealer)
    }

    #[must_use]
    pub const fn result(&self) -> Option<BlackjackResult> {
        self.result
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BlackjackCfg {
        BlackjackCfg::default()
    }

    #[test]
    fn deal_gives_two_cards_each_within_range() {
        let mut rng = RandomSource::from_seed(12);
        for _ in 0..100 {
            let session = BlackjackSession::deal(&cfg(), &mut rng, 0);
            assert_eq!(session.player().len(), 2);
            assert_eq!(session.dealer().len(), 2);
            assert!(session.player().iter().all(|c| (1..=11).contains(c)));
            if session.player_total() > 21 {
                assert_eq!(session.result(), Some(BlackjackResult::PlayerBust));
            } else {
                assert!(session.dealer_visible().is_none());
            }
        }
    }

    #[test]
    fn opening_double_eleven_is_a_bust() {
        let mut session = BlackjackSession::from_hands(&cfg(), &[11, 11], &[5, 5], 0);
        let mut rng = RandomSource::from_seed(1);
        assert_eq!(session.result(), Some(BlackjackResult::PlayerBust));
        assert_eq!(session.dealer_visible(), Some(&[5_u8, 5][..]));
        assert_eq!(session.hit(&mut rng), Err(GameError::SessionFinished));
    }

    #[test]
    fn hitting_past_target_busts() {
        let mut rng = RandomSource::from_seed(2);
        let mut session = BlackjackSession::from_hands(&cfg(), &[10, 10], &[5, 5], 0);
        // Every card is at least 1, so 20 + card always busts or hits 21.
        match session.hit(&mut rng).unwrap() {
            HitResult::Bust { total, .. } => {
                assert!(total > 21);
                assert_eq!(session.result(), Some(BlackjackResult::PlayerBust));
            }
            HitResult::Drew { card, total } => {
                assert_eq!(card, 1);
                assert_eq!(total, 21);
                assert!(!session.is_finished());
            }
        }
    }

    #[test]
    fn dealer_draws_to_seventeen() {
        let mut rng = RandomSource::from_seed(44);
        let mut session = BlackjackSession::from_hands(&cfg(), &[10, 9], &[2, 3], 0);
        let result = session.stand(&mut rng).unwrap();
        assert!(session.dealer_total() >= 17);
        let dealer = session.dealer_total();
        let expected = if dealer > 21 {
            BlackjackResult::DealerBust
        } else if 19 > dealer {
            BlackjackResult::PlayerWins
        } else if dealer == 19 {
            BlackjackResult::Draw
        } else {
            BlackjackResult::DealerWins
        };
        assert_eq!(result, expected);
        assert_eq!(session.dealer_visible(), Some(session.dealer()));
        assert_eq!(session.stand(&mut rng), Err(GameError::SessionFinished));
    }

    #[test]
    fn settlement_rules() {
        let mut rng = RandomSource::from_seed(0);
        let mut tie = BlackjackSession::from_hands(&cfg(), &[10, 8], &[9, 9], 0);
        assert_eq!(tie.stand(&mut rng), Ok(BlackjackResult::Draw));

        let mut loss = BlackjackSession::from_hands(&cfg(), &[10, 7], &[10, 9], 0);
        assert_eq!(loss.stand(&mut rng), Ok(BlackjackResult::DealerWins));

        let mut win = BlackjackSession::from_hands(&cfg(), &[10, 10], &[10, 8], 0);
        assert_eq!(win.stand(&mut rng), Ok(BlackjackResult::PlayerWins));
        assert!(BlackjackResult::PlayerWins.player_won());
        assert!(!BlackjackResult::Draw.player_won());
    }
}
