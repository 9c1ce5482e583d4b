//! Time source and timer scheduling collaborator.
use serde::{Deserialize, Serialize};

/// What a scheduled timer is meant to do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Flip a mismatched memory pair back face down.
    MemoryRevert,
    /// Turn the reaction screen green.
    ReactionArm,
}

/// Handle for a deferred transition.
///
/// A token is only honoured while its generation matches the controller's;
/// anything older belongs to a superseded round and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub generation: u64,
    pub kind: TimerKind,
}

/// Host-provided clock. All times are milliseconds on a monotonic scale.
pub trait Clock {
    /// Current time.
    fn now_ms(&self) -> u64;

    /// Ask the host to hand `token` back to the controller after `delay_ms`.
    fn schedule_after(&mut self, delay_ms: u64, token: TimerToken);

    /// Drop a previously scheduled token if it has not fired yet.
    fn cancel(&mut self, token: TimerToken);
}

/// Clock driven by hand, for tests and headless simulation.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: u64,
    pending: Vec<(u64, TimerToken)>,
}

impl ManualClock {
    #[must_use]
    pub const fn starting_at(now: u64) -> Self {
        Self {
            now,
            pending: Vec::new(),
        }
    }

    /// Move time forward and return every token that came due, in deadline
    /// order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<TimerToken> {
        let target = self.now.saturating_add(delta_ms);
        let due: Vec<TimerToken> = std::iter::from_fn(|| self.fire_next(target)).collect();
        self.now = target;
        due
    }

    /// Remove the earliest timer due at or before `until` and move time to
    /// its deadline, so the receiver observes the instant it fired.
    pub fn fire_next(&mut self, until: u64) -> Option<TimerToken> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= until)
            .min_by_key(|(_, (deadline, _))| *deadline)
            .map(|(index, _)| index)?;
        let (deadline, token) = self.pending.remove(index);
        self.now = self.now.max(deadline);
        Some(token)
    }

    /// Jump forward to `now`. Time never moves backwards.
    pub fn set_time(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn schedule_after(&mut self, delay_ms: u64, token: TimerToken) {
        self.pending.push((self.now.saturating_add(delay_ms), token));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|(_, pending)| *pending != token);
    }
}
