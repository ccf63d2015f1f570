//! `cc-switch ui` / `cc-switch serve`: the local settings server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ccswitch_gateway::{bind_listener, serve, GatewayState};
use tracing::{debug, info};

use crate::config::Config;
use crate::terminal_output::note_info;

pub async fn run(config: &Config, open_browser: bool) -> Result<()> {
    let listener = bind_listener(&config.host, config.port).await?;
    let local = listener
        .local_addr()
        .context("Settings server listener has no local address")?;
    let url = format!("http://{}:{}", config.host, local.port());

    info!(
        addr = %local,
        config_dir = %config.config_dir.display(),
        "Starting cc-switch settings server"
    );
    note_info(&format!("Starting UI at {url}"));

    if open_browser {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            match tokio::task::spawn_blocking(move || open_url(&url)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!(error = %e, "Could not open browser"),
                Err(e) => debug!(error = %e, "Browser opener task failed"),
            }
        });
    }

    let state = Arc::new(GatewayState::for_dir(&config.config_dir));
    serve(listener, state).await
}

fn open_url(url: &str) -> std::io::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(windows) {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        std::process::Command::new("xdg-open")
    };
    cmd.arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|_| ())
}
