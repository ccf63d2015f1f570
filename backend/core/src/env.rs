//! Derive the child-process environment from the active state.
//!
//! An empty value means "make sure this variable is unset in the child",
//! never "set it to the empty string".

use std::collections::BTreeMap;
use std::process::Command;

use crate::error::Result;
use crate::providers;
use crate::state::ActiveState;

/// Variable name to value. Ordered so output is stable.
pub type EnvMap = BTreeMap<String, String>;

pub const USE_FOUNDRY_VAR: &str = "CLAUDE_CODE_USE_FOUNDRY";
pub const FOUNDRY_BASE_URL_VAR: &str = "ANTHROPIC_FOUNDRY_BASE_URL";
pub const FOUNDRY_API_KEY_VAR: &str = "ANTHROPIC_FOUNDRY_API_KEY";
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";

pub const OPUS_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_OPUS_MODEL";
pub const SONNET_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_SONNET_MODEL";
pub const HAIKU_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_HAIKU_MODEL";
pub const CURRENT_MODEL_VAR: &str = "CLAUDE_MODEL";

/// Auth-mode and endpoint variables of every non-passthrough provider.
/// All of them are cleared before the selected provider sets its own.
pub const CLEARED_VARS: [&str; 10] = [
    "CLAUDE_CODE_USE_VERTEX",
    "CLOUD_ML_REGION",
    "ANTHROPIC_VERTEX_PROJECT_ID",
    USE_FOUNDRY_VAR,
    BASE_URL_VAR,
    API_KEY_VAR,
    AUTH_TOKEN_VAR,
    FOUNDRY_BASE_URL_VAR,
    "ANTHROPIC_FOUNDRY_RESOURCE",
    FOUNDRY_API_KEY_VAR,
];

/// Map the active state to the environment a child process should see.
///
/// The passthrough provider yields an empty map. Fails only if the state names
/// a provider the registry does not know.
pub fn build_environment(state: &ActiveState) -> Result<EnvMap> {
    let provider = providers::lookup(&state.provider)?;
    let mut env = EnvMap::new();

    if provider.is_passthrough() {
        return Ok(env);
    }

    for var in CLEARED_VARS {
        env.insert(var.to_string(), String::new());
    }

    let base_url = state
        .base_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .or_else(|| provider.default_base_url());
    let token = state.auth_token.as_str();

    if provider.uses_foundry() {
        env.insert(USE_FOUNDRY_VAR.to_string(), "1".to_string());
        if let Some(url) = base_url {
            env.insert(FOUNDRY_BASE_URL_VAR.to_string(), url.to_string());
        }
        if !token.is_empty() {
            env.insert(FOUNDRY_API_KEY_VAR.to_string(), token.to_string());
        }
    } else {
        if let Some(url) = base_url {
            env.insert(BASE_URL_VAR.to_string(), url.to_string());
        }
        if let (false, Some(var)) = (token.is_empty(), provider.auth_env_var) {
            env.insert(var.to_string(), token.to_string());
        }
    }

    let models = state.resolved_models(provider);
    for (var, model) in [
        (OPUS_MODEL_VAR, &models.opus),
        (SONNET_MODEL_VAR, &models.sonnet),
        (HAIKU_MODEL_VAR, &models.haiku),
    ] {
        if !model.is_empty() {
            env.insert(var.to_string(), model.clone());
        }
    }

    let current = match models.get(state.default_tier) {
        "" => models.sonnet.as_str(),
        model => model,
    };
    if !current.is_empty() {
        env.insert(CURRENT_MODEL_VAR.to_string(), current.to_string());
    }

    Ok(env)
}

/// Apply the map to a command: empty values unset, others set.
pub fn apply_to_command(env: &EnvMap, cmd: &mut Command) {
    for (key, value) in env {
        if value.is_empty() {
            cmd.env_remove(key);
        } else {
            cmd.env(key, value);
        }
    }
}

/// POSIX shell lines reproducing the map (`unset` / `export`).
pub fn render_shell_exports(env: &EnvMap) -> String {
    let mut out = String::new();
    for (key, value) in env {
        if value.is_empty() {
            out.push_str(&format!("unset {key}\n"));
        } else {
            out.push_str(&format!("export {key}={}\n", shell_quote(value)));
        }
    }
    out
}

/// Single-quote a value for POSIX shells.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tier;
    use chrono::Utc;
    use serde_json::Map;

    fn state(provider: &str) -> ActiveState {
        ActiveState {
            provider: provider.into(),
            default_tier: Tier::Sonnet,
            model: String::new(),
            model_opus: String::new(),
            model_sonnet: String::new(),
            model_haiku: String::new(),
            base_url: None,
            auth_token: String::new(),
            updated_at: Utc::now(),
            extra: Map::new(),
        }
    }

    fn get<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
        env.get(key).map(String::as_str)
    }

    #[test]
    fn passthrough_yields_empty_map() {
        let mut s = state("claude");
        s.base_url = Some("https://ignored.example".into());
        s.auth_token = "ignored".into();
        s.model_opus = "x".into();
        assert!(build_environment(&s).unwrap().is_empty());
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(build_environment(&state("nope")).is_err());
    }

    #[test]
    fn clearing_entries_present_for_every_other_provider() {
        for provider in providers::all().iter().filter(|p| !p.is_passthrough()) {
            let env = build_environment(&state(provider.id)).unwrap();
            for var in CLEARED_VARS {
                assert!(env.contains_key(var), "{} missing {var}", provider.id);
            }
        }
    }

    #[test]
    fn foundry_provider_switch() {
        let mut s = state("azure");
        s.base_url = Some("https://x.example/api".into());
        s.auth_token = "secret1".into();
        let env = build_environment(&s).unwrap();

        assert_eq!(get(&env, USE_FOUNDRY_VAR), Some("1"));
        assert_eq!(get(&env, FOUNDRY_BASE_URL_VAR), Some("https://x.example/api"));
        assert_eq!(get(&env, FOUNDRY_API_KEY_VAR), Some("secret1"));
        assert_eq!(get(&env, BASE_URL_VAR), Some(""));
        assert_eq!(get(&env, AUTH_TOKEN_VAR), Some(""));
        assert_eq!(get(&env, API_KEY_VAR), Some(""));
    }

    #[test]
    fn foundry_without_url_or_token_keeps_them_cleared() {
        let env = build_environment(&state("azure")).unwrap();
        assert_eq!(get(&env, USE_FOUNDRY_VAR), Some("1"));
        assert_eq!(get(&env, FOUNDRY_BASE_URL_VAR), Some(""));
        assert_eq!(get(&env, FOUNDRY_API_KEY_VAR), Some(""));
    }

    #[test]
    fn standard_provider_uses_registry_base_url() {
        let mut s = state("glm");
        s.auth_token = "tok".into();
        let env = build_environment(&s).unwrap();

        assert_eq!(get(&env, BASE_URL_VAR), Some("https://api.z.ai/api/anthropic"));
        assert_eq!(get(&env, AUTH_TOKEN_VAR), Some("tok"));
        assert_eq!(get(&env, USE_FOUNDRY_VAR), Some(""));
        assert_eq!(get(&env, CURRENT_MODEL_VAR), Some("glm-4.7"));
    }

    #[test]
    fn explicit_base_url_wins_over_registry_default() {
        let mut s = state("ollama");
        s.base_url = Some("http://gpu-box:11434".into());
        let env = build_environment(&s).unwrap();
        assert_eq!(get(&env, BASE_URL_VAR), Some("http://gpu-box:11434"));
    }

    #[test]
    fn token_dropped_when_provider_has_no_auth_var() {
        let mut s = state("ollama");
        s.auth_token = "unused".into();
        let env = build_environment(&s).unwrap();
        assert!(env.values().all(|v| v != "unused"));
    }

    #[test]
    fn token_goes_to_provider_specific_var() {
        let mut s = state("kimi");
        s.auth_token = "k".into();
        let env = build_environment(&s).unwrap();
        assert_eq!(get(&env, API_KEY_VAR), Some("k"));
        assert_eq!(get(&env, AUTH_TOKEN_VAR), Some(""));
    }

    #[test]
    fn default_tier_selects_current_model() {
        let mut s = state("glm");
        s.default_tier = Tier::Opus;
        s.model_opus = "m-o".into();
        s.model_sonnet = "m-s".into();
        s.model_haiku = "m-h".into();
        let env = build_environment(&s).unwrap();

        assert_eq!(get(&env, CURRENT_MODEL_VAR), Some("m-o"));
        assert_eq!(get(&env, OPUS_MODEL_VAR), Some("m-o"));
        assert_eq!(get(&env, SONNET_MODEL_VAR), Some("m-s"));
        assert_eq!(get(&env, HAIKU_MODEL_VAR), Some("m-h"));
    }

    #[test]
    fn empty_model_everywhere_emits_no_model_vars() {
        let env = build_environment(&state("custom")).unwrap();
        for var in [OPUS_MODEL_VAR, SONNET_MODEL_VAR, HAIKU_MODEL_VAR, CURRENT_MODEL_VAR] {
            assert!(!env.contains_key(var), "{var} should not be emitted");
        }
    }

    #[test]
    fn tier_fields_fall_back_to_legacy_model() {
        let mut s = state("custom");
        s.model = "my-model".into();
        s.default_tier = Tier::Haiku;
        let env = build_environment(&s).unwrap();
        assert_eq!(get(&env, HAIKU_MODEL_VAR), Some("my-model"));
        assert_eq!(get(&env, CURRENT_MODEL_VAR), Some("my-model"));
    }

    #[test]
    fn deterministic_and_input_untouched() {
        let mut s = state("kimi");
        s.auth_token = "abc".into();
        s.model_haiku = "h".into();
        let before = s.clone();
        let a = build_environment(&s).unwrap();
        let b = build_environment(&s).unwrap();
        assert_eq!(a, b);
        assert_eq!(s, before);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn shell_exports_unset_empty_and_quote_values() {
        let mut env = EnvMap::new();
        env.insert("A".into(), String::new());
        env.insert("B".into(), "it's".into());
        let out = render_shell_exports(&env);
        assert_eq!(out, "unset A\nexport B='it'\"'\"'s'\n");
    }

    #[test]
    fn apply_to_command_sets_and_removes() {
        let mut env = EnvMap::new();
        env.insert("CC_SWITCH_TEST_SET".into(), "v".into());
        env.insert("CC_SWITCH_TEST_CLEAR".into(), String::new());
        let mut cmd = Command::new("true");
        apply_to_command(&env, &mut cmd);

        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&(
            std::ffi::OsStr::new("CC_SWITCH_TEST_SET"),
            Some(std::ffi::OsStr::new("v"))
        )));
        assert!(envs.contains(&(std::ffi::OsStr::new("CC_SWITCH_TEST_CLEAR"), None)));
    }
}
