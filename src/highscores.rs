//! Best score per game mode
//!
//! A single scalar per mode, persisted through a key-value store
//! (LocalStorage on web, a JSON file on native).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Game mode, each with its own best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Arcade,
    /// Countdown timer forces game over
    TimeAttack,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Arcade => "Arcade",
            GameMode::TimeAttack => "Time Attack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(GameMode::Arcade),
            "time-attack" | "time_attack" | "timeattack" => Some(GameMode::TimeAttack),
            _ => None,
        }
    }

    /// Storage key for this mode's best score
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameMode::Arcade => "bestScoreArcade",
            GameMode::TimeAttack => "bestScoreTimeAttack",
        }
    }

    pub fn has_timer(&self) -> bool {
        matches!(self, GameMode::TimeAttack)
    }
}

/// Score store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Persistent key-value scalar store
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<f64>;
    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError>;
}

/// Volatile store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every set
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    values: HashMap<String, f64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open (or start) a store; an unreadable file starts empty
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt score file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<f64> {
        let storage = Self::storage()?;
        let raw = storage.get_item(key).ok().flatten()?;
        raw.parse().ok()
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        let storage = Self::storage().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, &value.to_string())
            .map_err(|_| StoreError::Unavailable)
    }
}

/// Best score tracker over a store
pub struct BestScores<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> BestScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Best score recorded for a mode (0 if none)
    pub fn best(&self, mode: GameMode) -> u64 {
        self.store
            .get(mode.storage_key())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0)
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, mode: GameMode, score: u64) -> bool {
        score > self.best(mode)
    }

    /// Record a finished run; returns true on a new best
    ///
    /// Store failures are logged and swallowed.
    pub fn submit(&mut self, mode: GameMode, score: u64) -> bool {
        if !self.qualifies(mode, score) {
            return false;
        }
        match self.store.set(mode.storage_key(), score as f64) {
            Ok(()) => {
                log::info!("New best {} score: {}", mode.as_str(), score);
                true
            }
            Err(e) => {
                log::warn!("Failed to save best score: {}", e);
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
