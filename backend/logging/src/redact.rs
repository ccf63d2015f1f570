//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens and `KEY=value` credential assignments from
//! strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static SECRET_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z0-9_]*(?:TOKEN|KEY|SECRET)[A-Z0-9_]*)=(\S+)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    SECRET_ASSIGN_RE
        .replace_all(&redacted, "$1=[REDACTED]")
        .into_owned()
}
