use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for cc-switch.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("invalid tier: {0} (expected one of opus, sonnet, haiku)")]
    InvalidTier(String),

    #[error("{0}")]
    Validation(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwitchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by caller input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownProvider(_) | Self::InvalidTier(_) | Self::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SwitchError>;
