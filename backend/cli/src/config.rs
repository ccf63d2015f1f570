use std::path::PathBuf;

use ccswitch_config::config_dir;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

/// cc-switch runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings server bind address
    pub host: String,
    /// Settings server port
    pub port: u16,
    /// Directory holding state.json, processes.json and logs/
    pub config_dir: PathBuf,
    /// `CC_SWITCH_LOG_LEVEL`; RUST_LOG still takes precedence
    pub log_level: Option<String>,
    /// Executable started by `run`
    pub claude_bin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            config_dir: config_dir(),
            log_level: None,
            claude_bin: "claude".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: get("CC_SWITCH_HOST").unwrap_or(defaults.host),
            port: get("CC_SWITCH_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            config_dir: defaults.config_dir,
            log_level: get("CC_SWITCH_LOG_LEVEL").or(defaults.log_level),
            claude_bin: get("CC_SWITCH_CLAUDE_BIN").unwrap_or(defaults.claude_bin),
        }
    }

    /// Level for the logger: the configured one, else `info` while serving
    /// and `warn` for one-shot commands.
    pub fn effective_log_level(&self, serving: bool) -> &str {
        match &self.log_level {
            Some(level) => level.as_str(),
            None if serving => "info",
            None => "warn",
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}
