//! Structured Logger
//!
//! Wraps `tracing` with a human-readable console layer on stderr and an
//! optional daily-rolling NDJSON file layer.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "cc-switch";

/// Initialize the global structured logger.
///
/// Console output goes to stderr so that commands printing shell code on
/// stdout stay pipeable. `RUST_LOG` overrides `level`. When `log_dir` is given
/// and usable, JSON lines are also written to `cc-switch.YYYY-MM-DD.log` there.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir
        .and_then(|dir| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(dir)
                .ok()
        })
        .map(|appender| fmt::layer().json().with_writer(appender).with_ansi(false));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
