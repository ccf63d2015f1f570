//! Bookkeeping of child processes launched through `cc-switch run`.
//!
//! A JSON array in `processes.json` next to the state file. The table is
//! advisory: read failures yield an empty list and dead entries are pruned
//! lazily when listing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ccswitch_config::{atomic_write, ensure_dir};
use ccswitch_core::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::liveness::is_process_alive;

pub const PROCESSES_FILE_NAME: &str = "processes.json";

/// A launched child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub cwd: String,
    pub command: String,
    pub provider: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProcessTable {
    dir: PathBuf,
}

impl ProcessTable {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(PROCESSES_FILE_NAME)
    }

    pub async fn register(&self, record: ProcessRecord) -> Result<()> {
        let mut entries = self.read().await;
        entries.retain(|e| e.pid != record.pid);
        debug!(pid = record.pid, provider = %record.provider, "Registering process");
        entries.push(record);
        self.write(&entries).await
    }

    pub async fn unregister(&self, pid: u32) -> Result<()> {
        let mut entries = self.read().await;
        entries.retain(|e| e.pid != pid);
        self.write(&entries).await
    }

    /// Entries whose process still exists. Rewrites the file only if some
    /// entries were dropped.
    pub async fn list_alive(&self) -> Result<Vec<ProcessRecord>> {
        self.list_alive_with(is_process_alive).await
    }

    pub(crate) async fn list_alive_with(&self, alive: impl Fn(u32) -> bool) -> Result<Vec<ProcessRecord>> {
        let entries = self.read().await;
        let total = entries.len();
        let live: Vec<_> = entries.into_iter().filter(|e| alive(e.pid)).collect();
        if live.len() != total {
            debug!(pruned = total - live.len(), "Pruning dead processes");
            self.write(&live).await?;
        }
        Ok(live)
    }

    async fn read(&self) -> Vec<ProcessRecord> {
        let path = self.path();
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read process table");
                return Vec::new();
            }
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable process table");
            Vec::new()
        })
    }

    async fn write(&self, entries: &[ProcessRecord]) -> Result<()> {
        ensure_dir(&self.dir).await?;
        let json = serde_json::to_vec_pretty(entries)?;
        atomic_write(&self.path(), &json).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
