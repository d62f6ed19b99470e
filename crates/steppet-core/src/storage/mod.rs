mod config;
pub mod database;
pub mod migrations;

pub use config::{CelebrationsConfig, Config, GoalConfig, HistoryConfig, SubscriptionConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StoreError;
use crate::progression::EngineSnapshot;

/// Returns `~/.config/steppet[-dev]/` based on STEPPET_ENV.
///
/// Set STEPPET_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STEPPET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("steppet-dev")
    } else {
        base_dir.join("steppet")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Durable home of the engine snapshot.
///
/// A save must be all-or-nothing: either the whole snapshot is stored or the
/// previous one is left intact.
pub trait SnapshotStore: Send {
    /// Load the last saved snapshot, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<EngineSnapshot>, StoreError>;

    fn save(&mut self, snapshot: &EngineSnapshot) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<EngineSnapshot>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: EngineSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    /// Make every following save fail, to exercise the retry path.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn snapshot(&self) -> Option<&EngineSnapshot> {
        self.snapshot.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<EngineSnapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Locked);
        }
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}
