//! `cc-switch run`: start the assistant with the active provider's environment.

use anyhow::{Context, Result};
use ccswitch_config::{load_environment, StateStore};
use ccswitch_supervisor::{LaunchSpec, Launcher, ProcessTable};

/// Returns the child's exit code.
pub async fn run(store: &StateStore, program: &str, args: Vec<String>) -> Result<i32> {
    let (state, env) = load_environment(store).await?;
    let spec = LaunchSpec::new(program, args, state.provider);
    let launcher = Launcher::new(ProcessTable::new(store.dir()));
    launcher
        .run(&spec, &env)
        .await
        .with_context(|| format!("Failed to start {program}"))
}
