//! Response shapes of the settings API.

use ccswitch_config::mask_env_preview;
use ccswitch_core::{build_environment, providers, ActiveState, EnvMap, Result, Tier};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Active state as shown to clients. The token itself is never included.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub provider: String,
    pub provider_name: String,
    pub default_tier: Tier,
    pub model: String,
    pub model_opus: String,
    pub model_sonnet: String,
    pub model_haiku: String,
    pub base_url: Option<String>,
    pub has_auth_token: bool,
    pub auth_env_var: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub env_preview: EnvMap,
}

impl StateView {
    pub fn from_state(state: &ActiveState) -> Result<Self> {
        let provider = providers::lookup(&state.provider)?;
        let models = state.resolved_models(provider);
        let env = build_environment(state)?;

        Ok(Self {
            provider: state.provider.clone(),
            provider_name: provider.display_name.to_string(),
            default_tier: state.default_tier,
            model: state.fallback_model(provider),
            model_opus: models.opus,
            model_sonnet: models.sonnet,
            model_haiku: models.haiku,
            base_url: state.base_url.clone(),
            has_auth_token: state.has_auth_token(),
            auth_env_var: provider.auth_env_var.map(str::to_string),
            updated_at: state.updated_at,
            env_preview: mask_env_preview(&env),
        })
    }
}
