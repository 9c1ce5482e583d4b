//! Centralized tuning constants for the arcade games.
//!
//! Values that are meant to be adjusted at runtime live in
//! [`crate::config::ArcadeConfig`]; these are the fixed rules and the
//! fallbacks used when a configuration field is absent.

// Storage keys -------------------------------------------------------------
pub const STATS_KEY: &str = "arcade.stats";
pub const SETTINGS_KEY: &str = "arcade.settings";
pub const ACHIEVEMENTS_KEY: &str = "arcade.achievements";

// Number guess -------------------------------------------------------------
pub(crate) const GUESS_DEFAULT_MIN: i64 = 1;
pub(crate) const GUESS_DEFAULT_MAX: i64 = 100;
pub(crate) const GUESS_DEFAULT_MAX_ATTEMPTS: u32 = 10;

// Memory -------------------------------------------------------------------
pub(crate) const MEMORY_COPIES_PER_SYMBOL: usize = 2;
pub(crate) const MEMORY_REVERT_DELAY_MS: u64 = 1_000;
pub(crate) const MEMORY_DEFAULT_SYMBOLS: [&str; 8] =
    ["🍎", "🍌", "🍇", "🍉", "🍒", "🍍", "🥝", "🍑"];

// Odd / even ---------------------------------------------------------------
pub(crate) const ODD_EVEN_MIN: i64 = 1;
pub(crate) const ODD_EVEN_MAX: i64 = 100;
pub(crate) const ODD_EVEN_POINTS_PER_HIT: u32 = 10;
pub(crate) const FINGERS_MIN: i64 = 0;
pub(crate) const FINGERS_MAX: i64 = 10;

// Reaction -----------------------------------------------------------------
pub(crate) const REACTION_MIN_DELAY_MS: u64 = 2_000;
pub(crate) const REACTION_MAX_DELAY_MS: u64 = 6_000;

// Blackjack ----------------------------------------------------------------
pub(crate) const BLACKJACK_CARD_MIN: u8 = 1;
pub(crate) const BLACKJACK_CARD_MAX: u8 = 11;
pub(crate) const BLACKJACK_TARGET: u32 = 21;
pub(crate) const BLACKJACK_DEALER_STAND: u32 = 17;
pub(crate) const BLACKJACK_OPENING_CARDS: usize = 2;

// Number draw --------------------------------------------------------------
pub(crate) const DRAW_MAX_COUNT: u32 = 1_000;

// Roulette -----------------------------------------------------------------
pub(crate) const ROULETTE_MIN: i64 = 1;
pub(crate) const ROULETTE_MAX: i64 = 10;
pub(crate) const ROULETTE_PHRASES: [&str; 10] = [
    "Hoje é seu dia de sorte?",
    "Tente novamente!",
    "Quase lá!",
    "Você é sortudo!",
    "A roleta girou forte!",
    "O universo sorriu pra você!",
    "Mais uma vez?",
    "A sorte está lançada!",
    "Incrível!",
    "Continue tentando!",
];

// Achievements -------------------------------------------------------------
pub(crate) const ACH_REGULAR_GAMES: u32 = 10;
pub(crate) const ACH_VETERAN_GAMES: u32 = 50;
pub(crate) const ACH_HOT_STREAK: u32 = 3;
pub(crate) const ACH_UNSTOPPABLE_STREAK: u32 = 10;
pub(crate) const ACH_SHARP_GUESS_ATTEMPTS: u32 = 3;
pub(crate) const ACH_MEMORY_SPRINT_MS: u64 = 30_000;
pub(crate) const ACH_PARITY_STREAK: u32 = 5;
pub(crate) const ACH_LIGHTNING_MS: u64 = 250;
