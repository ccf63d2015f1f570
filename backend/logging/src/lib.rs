//! Structured logging components for cc-switch.
//!
//! Handles subscriber setup (console + rolling NDJSON file) and redaction of
//! credentials from strings that end up in log lines.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
