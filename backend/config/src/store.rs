//! Durable single-record state store with self-repair.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ccswitch_core::{ActiveState, Result, SwitchError};
use chrono::Utc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::io::{atomic_write, ensure_dir};
use crate::migration::{migrate_state, Migration};

/// State file name within the config directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Reads and writes the active state under an injected config directory.
///
/// No locking: concurrent writers race and the last rename wins, but readers
/// never observe a partially written file.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE_NAME)
    }

    /// Load the active state, repairing or creating the file as needed.
    ///
    /// Missing, malformed, or unknown-provider records are replaced by the
    /// initial record. Valid records are migrated and always re-persisted so
    /// the file on disk is normalized. Only I/O failures are returned.
    pub async fn load(&self) -> Result<ActiveState> {
        ensure_dir(&self.dir).await?;
        let path = self.state_path();

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "State file does not exist; creating default");
                return self.reset().await;
            }
            Err(e) => return Err(SwitchError::io(&path, e)),
        };

        match migrate_state(&raw, Utc::now()) {
            Migration::Migrated(state) => {
                self.save(&state).await?;
                Ok(state)
            }
            Migration::Reset(reason) => {
                warn!(path = %path.display(), %reason, "Discarding unusable state file");
                self.reset().await
            }
        }
    }

    /// Replace the stored record with `state`.
    pub async fn save(&self, state: &ActiveState) -> Result<()> {
        ensure_dir(&self.dir).await?;
        let json = serde_json::to_vec_pretty(state)?;
        atomic_write(&self.state_path(), &json).await?;
        debug!(provider = %state.provider, "Saved state");
        Ok(())
    }

    async fn reset(&self) -> Result<ActiveState> {
        let state = ActiveState::initial(Utc::now());
        self.save(&state).await?;
        info!(path = %self.state_path().display(), "Wrote default state");
        Ok(state)
    }
}
