//! `ccswitch-core`: provider registry, active state model and the
//! environment builder that turns a stored selection into child-process
//! environment variables.

pub mod env;
pub mod error;
pub mod providers;
pub mod state;

pub use env::{apply_to_command, build_environment, render_shell_exports, EnvMap};
pub use error::{Result, SwitchError};
pub use providers::{ProviderDefinition, FOUNDRY_PROVIDER, PASSTHROUGH_PROVIDER};
pub use state::{ActiveState, Tier, TierModels};
