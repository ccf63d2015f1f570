//! Static provider registry.
//!
//! The set of providers is fixed at build time. Adding one is a table edit.

use serde::Serialize;

use crate::error::{Result, SwitchError};

/// Provider that leaves the assistant's own defaults untouched.
pub const PASSTHROUGH_PROVIDER: &str = "claude";

/// Provider activated through the Foundry variables instead of the shared ones.
pub const FOUNDRY_PROVIDER: &str = "azure";

/// Fixed attributes of a known provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderDefinition {
    pub id: &'static str,
    #[serde(rename = "name")]
    pub display_name: &'static str,
    pub base_url: Option<&'static str>,
    pub auth_env_var: Option<&'static str>,
    /// UI validation hint only.
    pub requires_auth: bool,
    pub default_model: &'static str,
}

impl ProviderDefinition {
    /// Registry base URL, treating an empty entry as "no default".
    pub fn default_base_url(&self) -> Option<&'static str> {
        self.base_url.filter(|url| !url.is_empty())
    }

    pub fn is_passthrough(&self) -> bool {
        self.id == PASSTHROUGH_PROVIDER
    }

    pub fn uses_foundry(&self) -> bool {
        self.id == FOUNDRY_PROVIDER
    }
}

static PROVIDERS: &[ProviderDefinition] = &[
    ProviderDefinition {
        id: "claude",
        display_name: "Claude (Default)",
        base_url: None,
        auth_env_var: None,
        requires_auth: false,
        default_model: "claude-opus-4-1",
    },
    ProviderDefinition {
        id: "azure",
        display_name: "Azure Anthropic",
        base_url: Some(""),
        auth_env_var: Some("ANTHROPIC_FOUNDRY_API_KEY"),
        requires_auth: true,
        default_model: "claude-opus-4-1",
    },
    ProviderDefinition {
        id: "glm",
        display_name: "GLM (Zhipu AI)",
        base_url: Some("https://api.z.ai/api/anthropic"),
        auth_env_var: Some("ANTHROPIC_AUTH_TOKEN"),
        requires_auth: true,
        default_model: "glm-4.7",
    },
    ProviderDefinition {
        id: "ollama",
        display_name: "Ollama (Local)",
        base_url: Some("http://localhost:11434"),
        auth_env_var: None,
        requires_auth: false,
        default_model: "qwen3-coder",
    },
    ProviderDefinition {
        id: "kimi",
        display_name: "Kimi (Moonshot)",
        base_url: Some("https://api.kimi.com/coding/"),
        auth_env_var: Some("ANTHROPIC_API_KEY"),
        requires_auth: true,
        default_model: "kimi-k2.5",
    },
    ProviderDefinition {
        id: "custom",
        display_name: "Custom Provider",
        base_url: Some(""),
        auth_env_var: Some("ANTHROPIC_AUTH_TOKEN"),
        requires_auth: true,
        default_model: "",
    },
];

/// All registered providers in display order.
pub fn all() -> &'static [ProviderDefinition] {
    PROVIDERS
}

/// Look up a provider by id.
pub fn lookup(id: &str) -> Result<&'static ProviderDefinition> {
    PROVIDERS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SwitchError::UnknownProvider(id.to_string()))
}

pub fn is_known(id: &str) -> bool {
    PROVIDERS.iter().any(|p| p.id == id)
}
