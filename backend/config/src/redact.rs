//! Masking of secrets in derived environment previews.

use ccswitch_core::EnvMap;

/// Placeholder shown instead of a secret value.
pub const MASK: &str = "<set>";

/// Variable names whose values are credentials.
pub fn is_secret_var(name: &str) -> bool {
    name.contains("KEY") || name.contains("TOKEN")
}

/// Copy of `env` with non-empty credential values replaced by [`MASK`].
///
/// Empty values stay empty so the preview still shows which variables are
/// cleared.
pub fn mask_env_preview(env: &EnvMap) -> EnvMap {
    env.iter()
        .map(|(key, value)| {
            let shown = if !value.is_empty() && is_secret_var(key) {
                MASK.to_string()
            } else {
                value.clone()
            };
            (key.clone(), shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_tokens_and_keys_only() {
        let mut env = EnvMap::new();
        env.insert("ANTHROPIC_AUTH_TOKEN".into(), "tok".into());
        env.insert("ANTHROPIC_FOUNDRY_API_KEY".into(), "key".into());
        env.insert("ANTHROPIC_API_KEY".into(), String::new());
        env.insert("ANTHROPIC_BASE_URL".into(), "https://x".into());

        let masked = mask_env_preview(&env);
        assert_eq!(masked["ANTHROPIC_AUTH_TOKEN"], MASK);
        assert_eq!(masked["ANTHROPIC_FOUNDRY_API_KEY"], MASK);
        assert_eq!(masked["ANTHROPIC_API_KEY"], "");
        assert_eq!(masked["ANTHROPIC_BASE_URL"], "https://x");
    }
}
