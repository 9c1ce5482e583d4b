//! Reaction time: wait for the signal, then click as fast as possible.
use serde::{Deserialize, Serialize};

use crate::numbers::mean_ms;
use crate::outcome::{GameKind, Metric, Outcome};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReactionPhase {
    #[default]
    Idle,
    Waiting,
    Ready,
    TooEarly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum ClickResult {
    /// Nothing to measure in the current phase.
    Ignored,
    TooEarly,
    Measured { ms: u64, personal_best: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSession {
    phase: ReactionPhase,
    armed_at: Option<u64>,
    history: Vec<u64>,
    best_ms: Option<u64>,
    min_delay_ms: u64,
    max_delay_ms: u64,
    started_at: u64,
}

impl ReactionSession {
    #[must_use]
    pub const fn new(min_delay_ms: u64, max_delay_ms: u64, now: u64) -> Self {
        Self {
            phase: ReactionPhase::Idle,
            armed_at: None,
            history: Vec::new(),
            best_ms: None,
            min_delay_ms,
            max_delay_ms,
            started_at: now,
        }
    }

    /// Begin a test: enter `Waiting` and return the arming delay the host
    /// should wait before calling [`ReactionSession::arm`]. Any test still
    /// in flight is abandoned.
    pub fn begin(&mut self, rng: &mut RandomSource) -> u64 {
        if matches!(self.phase, ReactionPhase::Waiting | ReactionPhase::Ready) {
            log::debug!("reaction test restarted while {:?}", self.phase);
        }
        self.phase = ReactionPhase::Waiting;
        self.armed_at = None;
        let min = i64::try_from(self.min_delay_ms).unwrap_or(i64::MAX);
        let max = i64::try_from(self.max_delay_ms).unwrap_or(i64::MAX);
        rng.draw_int(min, max)
            .ok()
            .and_then(|delay| u64::try_from(delay).ok())
            .unwrap_or(self.min_delay_ms)
    }

    /// Show the signal. Returns false when no test is waiting.
    pub fn arm(&mut self, now: u64) -> bool {
        if self.phase != ReactionPhase::Waiting {
            return false;
        }
        self.phase = ReactionPhase::Ready;
        self.armed_at = Some(now);
        true
    }

    pub fn click(&mut self, now: u64) -> ClickResult {
        match self.phase {
            ReactionPhase::Idle | ReactionPhase::TooEarly => ClickResult::Ignored,
            ReactionPhase::Waiting => {
                self.phase = ReactionPhase::TooEarly;
                ClickResult::TooEarly
            }
            ReactionPhase::Ready => {
                let armed_at = self.armed_at.take().unwrap_or(now);
                let ms = now.saturating_sub(armed_at);
                let personal_best = self.best_ms.is_none_or(|best| ms < best);
                if personal_best {
                    self.best_ms = Some(ms);
                }
                self.history.push(ms);
                self.phase = ReactionPhase::Idle;
                ClickResult::Measured { ms, personal_best }
            }
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ReactionPhase {
        self.phase
    }

    #[must_use]
    pub const fn armed_at(&self) -> Option<u64> {
        self.armed_at
    }

    #[must_use]
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    #[must_use]
    pub const fn best_ms(&self) -> Option<u64> {
        self.best_ms
    }

    #[must_use]
    pub fn last_ms(&self) -> Option<u64> {
        self.history.last().copied()
    }

    #[must_use]
    pub fn average_ms(&self) -> Option<f64> {
        mean_ms(&self.history)
    }

    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }

    /// Outcome of the most recent measurement.
    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_ms()
            .map(|ms| Outcome::won(GameKind::Reaction, Metric::ReactionMs { ms }))
    }
}
