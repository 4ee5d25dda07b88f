//! Snapshot persistence for the registry's visible state.
//!
//! After every successful mutation the registry hands its [`RegistryState`]
//! to a [`SnapshotStore`]; at construction it seeds from a prior snapshot if
//! one exists. Only non-secret state ever reaches this layer.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;
use crate::registry::models::RegistryState;
use crate::utils::paths::get_snapshot_path;

/// Durable sink for the registry's visible state.
pub trait SnapshotStore: Send + Sync {
    /// Load the last snapshot, or `None` if no snapshot exists yet.
    fn load(&self) -> Result<Option<RegistryState>>;

    /// Persist the given state, replacing any prior snapshot.
    fn save(&self, state: &RegistryState) -> Result<()>;
}

/// Snapshot store backed by a pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at the default location (~/.modelvault/profiles.json).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: get_snapshot_path()?,
        })
    }

    /// Store at an explicit path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<RegistryState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let state: RegistryState = serde_json::from_str(&contents)?;

        tracing::debug!("Loaded {} profiles from snapshot", state.profiles.len());

        Ok(Some(state))
    }

    fn save(&self, state: &RegistryState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, contents)?;

        tracing::debug!("Saved {} profiles to snapshot", state.profiles.len());

        Ok(())
    }
}

/// In-process snapshot store for tests and ephemeral embedding.
#[derive(Default)]
pub struct MemorySnapshots {
    state: Mutex<Option<RegistryState>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded with a snapshot, as if one had been saved earlier.
    pub fn with_state(state: RegistryState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl SnapshotStore for MemorySnapshots {
    fn load(&self) -> Result<Option<RegistryState>> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, state: &RegistryState) -> Result<()> {
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}
