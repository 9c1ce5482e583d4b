//! Odd or even, played as an endless run of rounds.
//!
//! Two ways to play a round: call the parity of a hidden number, or the
//! classic finger game where both sides show 0 to 10 fingers and the parity
//! of the sum decides. There is no terminal state; a miss only resets the
//! running streak.
use serde::{Deserialize, Serialize};

use crate::constants::{FINGERS_MAX, FINGERS_MIN};
use crate::error::GameError;
use crate::outcome::{GameKind, Metric, Outcome};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    #[must_use]
    pub const fn of(value: i64) -> Self {
        if value.rem_euclid(2) == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }
}

/// Everything revealed by a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub pick: Parity,
    /// The number whose parity decided the round (the sum for fingers).
    pub number: i64,
    pub player_fingers: Option<i64>,
    pub system_fingers: Option<i64>,
    pub correct: bool,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddEvenSession {
    min: i64,
    max: i64,
    points_per_hit: u32,
    current_number: i64,
    score: u32,
    streak: u32,
    best_streak: u32,
    rounds: u32,
    last_round: Option<RoundReport>,
    started_at: u64,
}

impl OddEvenSession {
    /// Open the table and draw the first hidden number.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] when `min > max`.
    pub fn start(
        min: i64,
        max: i64,
        points_per_hit: u32,
        rng: &mut RandomSource,
        now: u64,
    ) -> Result<Self, GameError> {
        let current_number = rng.draw_int(min, max)?;
        Ok(Self {
            min,
            max,
            points_per_hit,
            current_number,
            score: 0,
            streak: 0,
            best_streak: 0,
            rounds: 0,
            last_round: None,
            started_at: now,
        })
    }

    /// Call the parity of the hidden number, then draw the next one.
    ///
    /// # Errors
    ///
    /// Only fails if the configured range became invalid.
    pub fn guess(
        &mut self,
        pick: Parity,
        rng: &mut RandomSource,
    ) -> Result<RoundReport, GameError> {
        let next = rng.draw_int(self.min, self.max)?;
        let number = std::mem::replace(&mut self.current_number, next);
        Ok(self.settle(pick, number, None, None))
    }

    /// Finger round: the player shows `player_fingers`, the system answers
    /// with its own draw and the parity of the sum decides.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidGuess`] when `player_fingers` is outside
    /// `0..=10`; the session is left untouched.
    pub fn play_fingers(
        &mut self,
        pick: Parity,
        player_fingers: i64,
        rng: &mut RandomSource,
    ) -> Result<RoundReport, GameError> {
        if !(FINGERS_MIN..=FINGERS_MAX).contains(&player_fingers) {
            return Err(GameError::InvalidGuess {
                min: FINGERS_MIN,
                max: FINGERS_MAX,
            });
        }
        let system_fingers = rng.draw_int(FINGERS_MIN, FINGERS_MAX)?;
        let sum = player_fingers + system_fingers;
        Ok(self.settle(pick, sum, Some(player_fingers), Some(system_fingers)))
    }

    fn settle(
        &mut self,
        pick: Parity,
        number: i64,
        player_fingers: Option<i64>,
        system_fingers: Option<i64>,
    ) -> RoundReport {
        self.rounds += 1;
        let correct = Parity::of(number) == pick;
        let outcome = if correct {
            self.score = self.score.saturating_add(self.points_per_hit);
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            Outcome::won(GameKind::OddEven, Metric::Streak { streak: self.streak })
        } else {
            let broken = std::mem::take(&mut self.streak);
            Outcome::lost(GameKind::OddEven, Metric::Streak { streak: broken })
        };
        let report = RoundReport {
            pick,
            number,
            player_fingers,
            system_fingers,
            correct,
            outcome,
        };
        self.last_round = Some(report);
        report
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub const fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub const fn last_round(&self) -> Option<&RoundReport> {
        self.last_round.as_ref()
    }

    /// The hidden number the next parity call is judged against.
    #[must_use]
    pub const fn current_number(&self) -> i64 {
        self.current_number
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64) -> (OddEvenSession, RandomSource) {
        let mut rng = RandomSource::from_seed(seed);
        let session = OddEvenSession::start(1, 100, 10, &mut rng, 0).unwrap();
        (session, rng)
    }

    #[test]
    fn parity_of_negative_numbers() {
        assert_eq!(Parity::of(-3), Parity::Odd);
        assert_eq!(Parity::of(-4), Parity::Even);
        assert_eq!(Parity::of(0), Parity::Even);
    }

    #[test]
    fn correct_call_scores_and_extends_streak() {
        let (mut session, mut rng) = session(21);
        for expected_streak in 1..=4 {
            let pick = Parity::of(session.current_number());
            let report = session.guess(pick, &mut rng).unwrap();
            assert!(report.correct);
            assert_eq!(session.streak(), expected_streak);
        }
        assert_eq!(session.score(), 40);
        assert_eq!(session.best_streak(), 4);
    }

    #[test]
    fn miss_resets_streak_but_keeps_best_and_score() {
        let (mut session, mut rng) = session(8);
        for _ in 0..3 {
            let pick = Parity::of(session.current_number());
            let _ = session.guess(pick, &mut rng).unwrap();
        }
        let wrong = match Parity::of(session.current_number()) {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        };
        let report = session.guess(wrong, &mut rng).unwrap();
        assert!(!report.correct);
        assert_eq!(
            report.outcome,
            Outcome::lost(GameKind::OddEven, Metric::Streak { streak: 3 })
        );
        assert_eq!(session.streak(), 0);
        assert_eq!(session.best_streak(), 3);
        assert_eq!(session.score(), 30);
        assert_eq!(session.rounds(), 4);
    }

    #[test]
    fn fingers_round_uses_sum_parity() {
        let (mut session, mut rng) = session(3);
        let report = session.play_fingers(Parity::Even, 4, &mut rng).unwrap();
        let system = report.system_fingers.unwrap();
        assert!((0..=10).contains(&system));
        assert_eq!(report.number, 4 + system);
        assert_eq!(report.correct, Parity::of(4 + system) == Parity::Even);
    }

    #[test]
    fn fingers_out_of_range_is_rejected_without_change() {
        let (mut session, mut rng) = session(3);
        let before = session.clone();
        assert_eq!(
            session.play_fingers(Parity::Odd, 11, &mut rng),
            Err(GameError::InvalidGuess { min: 0, max: 10 })
        );
        assert_eq!(session, before);
    }
}
