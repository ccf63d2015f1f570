//! `cc-switch switch`: change the active provider from the command line.

use anyhow::Result;
use ccswitch_config::{switch_provider, StateStore, SwitchRequest};
use clap::Args;

use crate::terminal_output::note_success;

#[derive(Args, Debug, Default)]
pub struct SwitchArgs {
    /// Provider id (see `cc-switch providers`)
    pub provider: String,
    /// Default tier: opus, sonnet or haiku
    #[arg(long)]
    pub tier: Option<String>,
    /// Fallback model for every tier
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub opus: Option<String>,
    #[arg(long)]
    pub sonnet: Option<String>,
    #[arg(long)]
    pub haiku: Option<String>,
    /// Override the provider base URL (empty string resets it)
    #[arg(long)]
    pub base_url: Option<String>,
    /// Auth token; pass an empty string to clear the stored one
    #[arg(long)]
    pub token: Option<String>,
}

impl SwitchArgs {
    pub fn into_request(self) -> SwitchRequest {
        SwitchRequest {
            provider: Some(self.provider),
            default_tier: self.tier,
            model: self.model,
            model_opus: self.opus,
            model_sonnet: self.sonnet,
            model_haiku: self.haiku,
            base_url: self.base_url,
            auth_token: self.token,
        }
    }
}

pub async fn run(store: &StateStore, args: SwitchArgs) -> Result<()> {
    let state = switch_provider(store, &args.into_request()).await?;
    note_success(&format!(
        "Active provider: {} (tier {}, model {})",
        state.provider, state.default_tier, state.model
    ));
    Ok(())
}
