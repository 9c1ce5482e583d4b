//! Per-game session state machines behind a single tagged type.
use serde::{Deserialize, Serialize};

use crate::clock::TimerKind;
use crate::config::ArcadeConfig;
use crate::error::GameError;
use crate::outcome::{GameKind, Outcome};
use crate::rng::RandomSource;

pub mod blackjack;
pub mod draw;
pub mod memory;
pub mod number_guess;
pub mod odd_even;
pub mod reaction;

use blackjack::{BlackjackResult, BlackjackSession, HitResult};
use memory::{FlipResult, MemorySession};
use number_guess::{GuessResult, NumberGuessSession};
use odd_even::{OddEvenSession, Parity, RoundReport};
use reaction::{ClickResult, ReactionSession};

/// Player input routed to the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "input")]
pub enum GameInput {
    Guess { value: i64 },
    Flip { index: usize },
    Parity { pick: Parity },
    Fingers { pick: Parity, fingers: i64 },
    /// Start a new reaction test.
    Begin,
    Click,
    Hit,
    Stand,
}

/// What an accepted input or fired timer did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "feedback", content = "detail")]
pub enum Feedback {
    Guess(GuessResult),
    Flip(FlipResult),
    Reverted { first: usize, second: usize },
    Round(RoundReport),
    Waiting { delay_ms: u64 },
    Armed,
    Reaction(ClickResult),
    Hit(HitResult),
    Settled(BlackjackResult),
    /// A timer fired for a phase the session already left.
    Nothing,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub feedback: Feedback,
    /// Outcome to feed the ledger, at most once per finished session or
    /// per round for round-based games.
    pub outcome: Option<Outcome>,
    /// Deferred transition the host must schedule.
    pub schedule: Option<(u64, TimerKind)>,
}

impl Step {
    const fn feedback(feedback: Feedback) -> Self {
        Self {
            feedback,
            outcome: None,
            schedule: None,
        }
    }
}

/// Shared inputs for a transition.
pub struct StepCtx<'a> {
    pub rng: &'a mut RandomSource,
    pub now: u64,
}

/// One game's transient round state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "game")]
pub enum GameSession {
    NumberGuess(NumberGuessSession),
    Memory(MemorySession),
    OddEven(OddEvenSession),
    Reaction(ReactionSession),
    Blackjack(BlackjackSession),
}

impl GameSession {
    /// Open a session for `kind` using the configured parameters.
    ///
    /// # Errors
    ///
    /// [`GameError::UnsupportedInput`] for the one-shot tools, which have no
    /// session, and range errors from a misconfigured game.
    pub fn start(
        kind: GameKind,
        cfg: &ArcadeConfig,
        ctx: &mut StepCtx<'_>,
    ) -> Result<Self, GameError> {
        let session = match kind {
            GameKind::NumberGuess => Self::NumberGuess(NumberGuessSession::start(
                cfg.number_guess.min,
                cfg.number_guess.max,
                cfg.number_guess.max_attempts,
                ctx.rng,
                ctx.now,
            )?),
            GameKind::Memory => Self::Memory(MemorySession::start(
                &cfg.memory.symbols,
                cfg.memory.revert_delay_ms,
                ctx.rng,
                ctx.now,
            )),
            GameKind::OddEven => Self::OddEven(OddEvenSession::start(
                cfg.odd_even.min,
                cfg.odd_even.max,
                cfg.odd_even.points_per_hit,
                ctx.rng,
                ctx.now,
            )?),
            GameKind::Reaction => Self::Reaction(ReactionSession::new(
                cfg.reaction.min_delay_ms,
                cfg.reaction.max_delay_ms,
                ctx.now,
            )),
            GameKind::Blackjack => {
                Self::Blackjack(BlackjackSession::deal(&cfg.blackjack, ctx.rng, ctx.now))
            }
            GameKind::NumberDraw | GameKind::Roulette => {
                return Err(GameError::UnsupportedInput { kind });
            }
        };
        Ok(session)
    }

    #[must_use]
    pub const fn kind(&self) -> GameKind {
        match self {
            Self::NumberGuess(_) => GameKind::NumberGuess,
            Self::Memory(_) => GameKind::Memory,
            Self::OddEven(_) => GameKind::OddEven,
            Self::Reaction(_) => GameKind::Reaction,
            Self::Blackjack(_) => GameKind::Blackjack,
        }
    }

    /// Route an input to the session.
    ///
    /// # Errors
    ///
    /// Rejected inputs leave the session unchanged: inputs the game does not
    /// understand, invalid values, and anything after a terminal state.
    pub fn apply(&mut self, input: GameInput, ctx: &mut StepCtx<'_>) -> Result<Step, GameError> {
        if self.is_terminal() {
            return Err(GameError::SessionFinished);
        }
        let kind = self.kind();
        match (self, input) {
            (Self::NumberGuess(session), GameInput::Guess { value }) => {
                let result = session.guess(value)?;
                Ok(Step {
                    outcome: result.outcome(),
                    ..Step::feedback(Feedback::Guess(result))
                })
            }
            (Self::Memory(session), GameInput::Flip { index }) => {
                let result = session.flip(index, ctx.now)?;
                let schedule = matches!(result, FlipResult::Mismatch { .. })
                    .then(|| (session.revert_delay_ms(), TimerKind::MemoryRevert));
                Ok(Step {
                    outcome: session.outcome(),
                    schedule,
                    ..Step::feedback(Feedback::Flip(result))
                })
            }
            (Self::OddEven(session), GameInput::Parity { pick }) => {
                let report = session.guess(pick, ctx.rng)?;
                Ok(Step {
                    outcome: Some(report.outcome),
                    ..Step::feedback(Feedback::Round(report))
                })
            }
            (Self::OddEven(session), GameInput::Fingers { pick, fingers }) => {
                let report = session.play_fingers(pick, fingers, ctx.rng)?;
                Ok(Step {
                    outcome: Some(report.outcome),
                    ..Step::feedback(Feedback::Round(report))
                })
            }
            (Self::Reaction(session), GameInput::Begin) => {
                let delay_ms = session.begin(ctx.rng);
                Ok(Step {
                    schedule: Some((delay_ms, TimerKind::ReactionArm)),
                    ..Step::feedback(Feedback::Waiting { delay_ms })
                })
            }
            (Self::Reaction(session), GameInput::Click) => {
                let result = session.click(ctx.now);
                let outcome = match result {
                    ClickResult::Measured { .. } => session.last_outcome(),
                    ClickResult::Ignored | ClickResult::TooEarly => None,
                };
                Ok(Step {
                    outcome,
                    ..Step::feedback(Feedback::Reaction(result))
                })
            }
            (Self::Blackjack(session), GameInput::Hit) => {
                let result = session.hit(ctx.rng)?;
                Ok(Step::feedback(Feedback::Hit(result)))
            }
            (Self::Blackjack(session), GameInput::Stand) => {
                let result = session.stand(ctx.rng)?;
                Ok(Step::feedback(Feedback::Settled(result)))
            }
            _ => Err(GameError::UnsupportedInput { kind }),
        }
    }

    /// Run the deferred transition for a fired timer.
    pub fn on_timer(&mut self, kind: TimerKind, now: u64) -> Step {
        match (self, kind) {
            (Self::Memory(session), TimerKind::MemoryRevert) => match session.resolve_pending() {
                Some((first, second)) => Step::feedback(Feedback::Reverted { first, second }),
                None => Step::feedback(Feedback::Nothing),
            },
            (Self::Reaction(session), TimerKind::ReactionArm) => {
                if session.arm(now) {
                    Step::feedback(Feedback::Armed)
                } else {
                    Step::feedback(Feedback::Nothing)
                }
            }
            _ => Step::feedback(Feedback::Nothing),
        }
    }

    /// Whether the session reached a state that only `reset` can leave.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::NumberGuess(session) => session.is_terminal(),
            Self::Memory(session) => session.is_terminal(),
            Self::Blackjack(session) => session.is_finished(),
            Self::OddEven(_) | Self::Reaction(_) => false,
        }
    }

    /// Terminal outcome for session-based games. Round-based games report
    /// outcomes through [`Step::outcome`] and blackjack is never tracked.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::NumberGuess(session) => session.outcome(),
            Self::Memory(session) => session.outcome(),
            Self::OddEven(_) | Self::Reaction(_) | Self::Blackjack(_) => None,
        }
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        match self {
            Self::NumberGuess(session) => session.started_at(),
            Self::Memory(session) => session.started_at(),
            Self::OddEven(session) => session.started_at(),
            Self::Reaction(session) => session.started_at(),
            Self::Blackjack(session) => session.started_at(),
        }
    }
}
