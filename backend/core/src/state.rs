//! The persisted active-provider record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SwitchError;
use crate::providers::{self, ProviderDefinition, PASSTHROUGH_PROVIDER};

/// Model quality class, each independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Opus,
    #[default]
    Sonnet,
    Haiku,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Opus, Tier::Sonnet, Tier::Haiku];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Opus => "opus",
            Tier::Sonnet => "sonnet",
            Tier::Haiku => "haiku",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opus" => Ok(Tier::Opus),
            "sonnet" => Ok(Tier::Sonnet),
            "haiku" => Ok(Tier::Haiku),
            other => Err(SwitchError::InvalidTier(other.to_string())),
        }
    }
}

/// The single active configuration record.
///
/// `model` is the legacy single-model field, kept equal to the fallback the
/// tier fields were filled from. Fields this version does not know about are
/// carried in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveState {
    pub provider: String,
    pub default_tier: Tier,
    pub model: String,
    pub model_opus: String,
    pub model_sonnet: String,
    pub model_haiku: String,
    pub base_url: Option<String>,
    /// Stored in clear text.
    pub auth_token: String,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-tier model names after fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierModels {
    pub opus: String,
    pub sonnet: String,
    pub haiku: String,
}

impl TierModels {
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::Opus => &self.opus,
            Tier::Sonnet => &self.sonnet,
            Tier::Haiku => &self.haiku,
        }
    }
}

impl ActiveState {
    /// Fresh record for the passthrough provider.
    pub fn initial(now: DateTime<Utc>) -> Self {
        let model = providers::lookup(PASSTHROUGH_PROVIDER)
            .map(|p| p.default_model)
            .unwrap_or_default()
            .to_string();
        Self {
            provider: PASSTHROUGH_PROVIDER.to_string(),
            default_tier: Tier::Sonnet,
            model_opus: model.clone(),
            model_sonnet: model.clone(),
            model_haiku: model.clone(),
            model,
            base_url: None,
            auth_token: String::new(),
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// `model`, else the provider's default model, else empty.
    pub fn fallback_model(&self, provider: &ProviderDefinition) -> String {
        if self.model.is_empty() {
            provider.default_model.to_string()
        } else {
            self.model.clone()
        }
    }

    /// Tier models with empty fields replaced by the fallback model.
    pub fn resolved_models(&self, provider: &ProviderDefinition) -> TierModels {
        let fallback = self.fallback_model(provider);
        let pick = |value: &str| {
            if value.is_empty() {
                fallback.clone()
            } else {
                value.to_string()
            }
        };
        TierModels {
            opus: pick(&self.model_opus),
            sonnet: pick(&self.model_sonnet),
            haiku: pick(&self.model_haiku),
        }
    }

    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.is_empty()
    }
}
