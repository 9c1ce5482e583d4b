//! Persistence boundary: a string blob store keyed by name, and the
//! application state persisted through it.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::achievements::AchievementSet;
use crate::constants::{ACHIEVEMENTS_KEY, SETTINGS_KEY, STATS_KEY};
use crate::settings::Settings;
use crate::stats::StatsLedger;

/// Trait for abstracting blob persistence.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `json` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save_blob(&self, key: &str, json: &str) -> Result<(), Self::Error>;
}

/// In-process storage. Clones share the same map, so a test can keep a
/// handle and inspect what the controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Raw blob under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    /// Seed a blob directly, bypassing serialization.
    pub fn insert_raw(&self, key: &str, json: &str) {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), json.to_string());
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn save_blob(&self, key: &str, json: &str) -> Result<(), Self::Error> {
        self.insert_raw(key, json);
        Ok(())
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub stats: StatsLedger,
    pub settings: Settings,
    pub achievements: AchievementSet,
}

impl AppState {
    /// Load every persisted blob; missing, unreadable or corrupt blobs fall
    /// back to their defaults.
    #[must_use]
    pub fn load<S: GameStorage>(storage: &S) -> Self {
        Self {
            stats: load_or_default(storage, STATS_KEY),
            settings: load_or_default(storage, SETTINGS_KEY),
            achievements: load_or_default(storage, ACHIEVEMENTS_KEY),
        }
    }

    pub fn save_stats<S: GameStorage>(&self, storage: &S) {
        save_logged(storage, STATS_KEY, &self.stats);
    }

    pub fn save_settings<S: GameStorage>(&self, storage: &S) {
        save_logged(storage, SETTINGS_KEY, &self.settings);
    }

    pub fn save_achievements<S: GameStorage>(&self, storage: &S) {
        save_logged(storage, ACHIEVEMENTS_KEY, &self.achievements);
    }
}

fn load_or_default<S, T>(storage: &S, key: &str) -> T
where
    S: GameStorage,
    T: DeserializeOwned + Default,
{
    match storage.load_blob(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
            log::warn!("corrupt blob under {key}, using defaults: {err}");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(err) => {
            log::warn!("failed to read {key}, using defaults: {err}");
            T::default()
        }
    }
}

fn save_logged<S, T>(storage: &S, key: &str, value: &T)
where
    S: GameStorage,
    T: Serialize,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("failed to serialize {key}: {err}");
            return;
        }
    };
    if let Err(err) = storage.save_blob(key, &json) {
        log::warn!("failed to persist {key}: {err}");
    }
}
