//! Config directory resolution and atomic file writes.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ccswitch_core::{Result, SwitchError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CC_SWITCH_CONFIG_DIR";

/// Resolve the cc-switch config directory.
/// Priority: `CC_SWITCH_CONFIG_DIR` env > `~/.config/cloud-code-switcher/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".config").join("cloud-code-switcher");
    }
    PathBuf::from(".cloud-code-switcher")
}

/// Create a directory and its parents. Existing directories are fine.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| SwitchError::io(dir, e))
}

/// Write `contents` to `path` so readers see either the old or the new file.
///
/// Writes a uniquely named sibling, syncs it, then renames it over `path`.
/// On failure the sibling is removed and the error returned.
pub async fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    atomic_write_with(path, contents, |tmp, dst| async move {
        fs::rename(&tmp, &dst).await
    })
    .await
}

/// [`atomic_write`] with the final rename step supplied by the caller.
pub(crate) async fn atomic_write_with<F, Fut>(path: &Path, contents: &[u8], commit: F) -> Result<()>
where
    F: FnOnce(PathBuf, PathBuf) -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let tmp_path = temp_sibling(path);

    let target = path.to_path_buf();
    let staged = tmp_path.clone();
    let written = async move {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&staged)
            .await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);
        commit(staged, target).await
    }
    .await;

    match written {
        Ok(()) => {
            debug!(path = %path.display(), bytes = contents.len(), "Wrote file atomically");
            Ok(())
        }
        Err(source) => {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                if e.kind() != ErrorKind::NotFound {
                    warn!(tmp = %tmp_path.display(), error = %e, "Failed to remove temp file");
                }
            }
            Err(SwitchError::io(path, source))
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("state");
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
