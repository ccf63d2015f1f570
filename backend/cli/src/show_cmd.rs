//! `cc-switch show`: current active provider state.

use anyhow::Result;
use ccswitch_config::StateStore;
use ccswitch_core::ActiveState;

pub async fn run(store: &StateStore) -> Result<()> {
    let state = store.load().await?;
    print!("{}", render(&state));
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn render(state: &ActiveState) -> String {
    let auth = if state.has_auth_token() { "configured" } else { "missing" };
    let lines = [
        ("provider", state.provider.as_str()),
        ("default_tier", state.default_tier.as_str()),
        ("model", or_dash(&state.model)),
        ("model_opus", or_dash(&state.model_opus)),
        ("model_sonnet", or_dash(&state.model_sonnet)),
        ("model_haiku", or_dash(&state.model_haiku)),
        ("base_url", or_dash(state.base_url.as_deref().unwrap_or(""))),
        ("auth", auth),
    ];

    let mut out = String::new();
    for (key, value) in lines {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str(&format!("updated_at: {}\n", state.updated_at.to_rfc3339()));
    out
}
