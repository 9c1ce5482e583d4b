//! Arcade Game Engine
//!
//! Platform-agnostic core logic for the arcade mini-games bundle.
//! This crate owns the per-game session state machines, scoring, the
//! statistics ledger and achievement evaluation. Rendering, audio, storage
//! and timers are collaborators reached through the traits in [`storage`]
//! and [`clock`] and through the events in [`view`].

pub mod achievements;
pub mod clock;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod games;
pub mod numbers;
pub mod outcome;
pub mod rng;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod view;

// Re-export commonly used types
pub use achievements::{Achievement, AchievementEngine, AchievementSet, RuleInput};
pub use clock::{Clock, ManualClock, TimerKind, TimerToken};
pub use config::{
    ArcadeConfig, BlackjackCfg, ConfigError, DrawCfg, MemoryCfg, NumberGuessCfg, OddEvenCfg,
    ReactionCfg, RouletteCfg,
};
pub use controller::SessionController;
pub use error::GameError;
pub use games::blackjack::{BlackjackResult, BlackjackSession};
pub use games::draw::{SpinResult, draw_distinct, spin};
pub use games::memory::{CardFace, MemorySession};
pub use games::number_guess::{GuessHint, NumberGuessSession, parse_guess};
pub use games::odd_even::{OddEvenSession, Parity};
pub use games::reaction::{ReactionPhase, ReactionSession};
pub use games::{Feedback, GameInput, GameSession, Step};
pub use outcome::{GameKind, Metric, MetricDirection, MetricKey, Outcome};
pub use rng::{RandomSource, RngBundle};
pub use settings::{Settings, Theme};
pub use stats::{GameRecord, StatsLedger};
pub use storage::{AppState, GameStorage, MemoryStorage};
pub use view::{Cue, Emit, Screen, ViewModel};
