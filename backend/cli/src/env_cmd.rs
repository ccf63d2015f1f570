//! `cc-switch env`: shell exports for the active state.
//!
//! Intended for `eval "$(cc-switch env)"`, so nothing but exports goes to stdout.

use anyhow::Result;
use ccswitch_config::{load_environment, StateStore};
use ccswitch_core::render_shell_exports;
use tracing::debug;

pub async fn run(store: &StateStore) -> Result<()> {
    let (state, env) = load_environment(store).await?;
    debug!(provider = %state.provider, vars = env.len(), "Rendering shell exports");
    print!("{}", render_shell_exports(&env));
    Ok(())
}
