//! Validation and merge of partial switch requests from the CLI and HTTP API.
//!
//! Omitted fields keep their previous value. The auth token distinguishes
//! three cases: omitted keeps, empty clears, non-empty sets.

use ccswitch_core::{providers, ActiveState, ProviderDefinition, Result, SwitchError, Tier};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Partial update of the active state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchRequest {
    pub provider: Option<String>,
    pub default_tier: Option<String>,
    pub model: Option<String>,
    pub model_opus: Option<String>,
    pub model_sonnet: Option<String>,
    pub model_haiku: Option<String>,
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
}

impl SwitchRequest {
    pub fn for_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Default::default()
        }
    }

    /// Check the request and resolve its provider.
    pub fn validate(&self) -> Result<&'static ProviderDefinition> {
        let id = self
            .provider
            .as_deref()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| SwitchError::Validation("provider is required".into()))?;
        let provider = providers::lookup(&id)?;

        if let Some(url) = trimmed(&self.base_url) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SwitchError::Validation(
                    "base_url must start with http:// or https://".into(),
                ));
            }
        }

        if let Some(tier) = trimmed(&self.default_tier) {
            tier.parse::<Tier>()?;
        }

        Ok(provider)
    }
}

/// Compute the full next state from `current` and a request.
pub fn apply_switch(
    current: &ActiveState,
    request: &SwitchRequest,
    now: DateTime<Utc>,
) -> Result<ActiveState> {
    let provider = request.validate()?;

    let fallback = trimmed(&request.model)
        .or_else(|| non_empty(current.model.trim()))
        .unwrap_or(provider.default_model)
        .to_string();
    let tier_model = |requested: &Option<String>, existing: &str| {
        trimmed(requested)
            .or_else(|| non_empty(existing.trim()))
            .map(str::to_string)
            .unwrap_or_else(|| fallback.clone())
    };

    // A provider change never carries the previous endpoint over.
    let base_url = match request.base_url.as_deref() {
        Some(url) => non_empty(url.trim()).map(str::to_string),
        None if current.provider == provider.id => current.base_url.clone(),
        None => provider.default_base_url().map(str::to_string),
    };

    let auth_token = match request.auth_token.as_deref() {
        Some(token) => token.trim().to_string(),
        None => current.auth_token.clone(),
    };

    let default_tier = match trimmed(&request.default_tier) {
        Some(tier) => tier.parse::<Tier>()?,
        None => current.default_tier,
    };

    Ok(ActiveState {
        provider: provider.id.to_string(),
        default_tier,
        model_opus: tier_model(&request.model_opus, &current.model_opus),
        model_sonnet: tier_model(&request.model_sonnet, &current.model_sonnet),
        model_haiku: tier_model(&request.model_haiku, &current.model_haiku),
        model: fallback.clone(),
        base_url,
        auth_token,
        updated_at: now,
        extra: current.extra.clone(),
    })
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(|v| non_empty(v.trim()))
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current() -> ActiveState {
        let mut state = ActiveState::initial(Utc::now());
        state.auth_token = "old-token".into();
        state
    }

    fn request(value: serde_json::Value) -> SwitchRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn provider_is_required_and_normalized() {
        let err = SwitchRequest::default().validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "provider is required");

        let provider = SwitchRequest::for_provider("  GLM ").validate().unwrap();
        assert_eq!(provider.id, "glm");
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = SwitchRequest::for_provider("openai").validate().unwrap_err();
        assert!(matches!(err, SwitchError::UnknownProvider(_)));
    }

    #[test]
    fn rejects_bad_url_scheme() {
        let req = request(json!({ "provider": "custom", "base_url": "ftp://x" }));
        assert!(matches!(req.validate(), Err(SwitchError::Validation(_))));
    }

    #[test]
    fn rejects_bad_tier() {
        let req = request(json!({ "provider": "glm", "default_tier": "large" }));
        assert!(matches!(req.validate(), Err(SwitchError::InvalidTier(_))));
    }

    #[test]
    fn omitted_token_keeps_existing() {
        let next = apply_switch(&current(), &SwitchRequest::for_provider("glm"), Utc::now()).unwrap();
        assert_eq!(next.auth_token, "old-token");
    }

    #[test]
    fn empty_token_clears() {
        let req = request(json!({ "provider": "glm", "auth_token": "  " }));
        let next = apply_switch(&current(), &req, Utc::now()).unwrap();
        assert_eq!(next.auth_token, "");
    }

    #[test]
    fn null_token_counts_as_omitted() {
        let req = request(json!({ "provider": "glm", "auth_token": null }));
        let next = apply_switch(&current(), &req, Utc::now()).unwrap();
        assert_eq!(next.auth_token, "old-token");
    }

    #[test]
    fn non_empty_token_is_set_trimmed() {
        let req = request(json!({ "provider": "glm", "auth_token": " new " }));
        let next = apply_switch(&current(), &req, Utc::now()).unwrap();
        assert_eq!(next.auth_token, "new");
    }

    #[test]
    fn provider_change_takes_registry_base_url() {
        let next = apply_switch(&current(), &SwitchRequest::for_provider("glm"), Utc::now()).unwrap();
        assert_eq!(next.base_url.as_deref(), Some("https://api.z.ai/api/anthropic"));

        let next = apply_switch(&next, &SwitchRequest::for_provider("custom"), Utc::now()).unwrap();
        assert_eq!(next.base_url, None);
    }

    #[test]
    fn same_provider_keeps_custom_base_url() {
        let mut state = current();
        state.provider = "ollama".into();
        state.base_url = Some("http://gpu:11434".into());
        let next = apply_switch(&state, &SwitchRequest::for_provider("ollama"), Utc::now()).unwrap();
        assert_eq!(next.base_url.as_deref(), Some("http://gpu:11434"));
    }

    #[test]
    fn empty_base_url_collapses_to_none() {
        let req = request(json!({ "provider": "custom", "base_url": " " }));
        let next = apply_switch(&current(), &req, Utc::now()).unwrap();
        assert_eq!(next.base_url, None);
    }

    #[test]
    fn models_merge_request_then_current_then_fallback() {
        let mut state = current();
        state.model_haiku = String::new();
        let req = request(json!({
            "provider": "glm",
            "model": "glm-4.7",
            "model_opus": "glm-5",
            "default_tier": "opus"
        }));
        let next = apply_switch(&state, &req, Utc::now()).unwrap();

        assert_eq!(next.model, "glm-4.7");
        assert_eq!(next.model_opus, "glm-5");
        assert_eq!(next.model_sonnet, "claude-opus-4-1");
        assert_eq!(next.model_haiku, "glm-4.7");
        assert_eq!(next.default_tier, Tier::Opus);
    }

    #[test]
    fn tier_kept_when_omitted_and_extra_carried_over() {
        let mut state = current();
        state.default_tier = Tier::Haiku;
        state.extra.insert("theme".into(), json!("dark"));
        let now = Utc::now();
        let next = apply_switch(&state, &SwitchRequest::for_provider("kimi"), now).unwrap();

        assert_eq!(next.default_tier, Tier::Haiku);
        assert_eq!(next.extra.get("theme"), Some(&json!("dark")));
        assert_eq!(next.updated_at, now);
    }
}
