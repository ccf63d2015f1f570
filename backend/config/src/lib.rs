//! `ccswitch-config`: persistence of the active provider selection.
//!
//! Provides:
//! - Config directory resolution (`CC_SWITCH_CONFIG_DIR` override)
//! - Atomic temp-file + rename writes
//! - Self-healing state store with legacy record migration
//! - Validation and merge of partial switch requests
//! - Secret masking for environment previews

pub mod io;
pub mod migration;
pub mod redact;
pub mod store;
pub mod switch;

pub use io::{atomic_write, config_dir, ensure_dir, CONFIG_DIR_ENV};
pub use migration::{migrate_state, Migration, ResetReason};
pub use redact::{is_secret_var, mask_env_preview, MASK};
pub use store::{StateStore, STATE_FILE_NAME};
pub use switch::{apply_switch, SwitchRequest};

use ccswitch_core::{build_environment, ActiveState, EnvMap, Result};

/// Load the active state and derive its environment in one step.
pub async fn load_environment(store: &StateStore) -> Result<(ActiveState, EnvMap)> {
    let state = store.load().await?;
    let env = build_environment(&state)?;
    Ok((state, env))
}

/// Validate a request, merge it over the stored state and persist the result.
pub async fn switch_provider(store: &StateStore, request: &SwitchRequest) -> Result<ActiveState> {
    request.validate()?;
    let current = store.load().await?;
    let next = apply_switch(&current, request, chrono::Utc::now())?;
    store.save(&next).await?;
    tracing::info!(
        from = %current.provider,
        to = %next.provider,
        tier = %next.default_tier,
        "Switched provider"
    );
    Ok(next)
}
