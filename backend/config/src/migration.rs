//! Repair and migration of the on-disk state record.
//!
//! Older state files carried a single `model` field and no `default_tier`.
//! Anything that cannot be turned into a valid record is reported as a reset
//! so the caller can start over from the initial record.

use std::fmt;

use ccswitch_core::{providers, ActiveState, Tier};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Fields owned by [`ActiveState`]; everything else is carried in `extra`.
const KNOWN_FIELDS: &[&str] = &[
    "provider",
    "default_tier",
    "model",
    "model_opus",
    "model_sonnet",
    "model_haiku",
    "base_url",
    "auth_token",
    "updated_at",
];

/// Why a stored record was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    Malformed(String),
    NotAnObject,
    MissingProvider,
    UnknownProvider(String),
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetReason::Malformed(e) => write!(f, "malformed JSON: {e}"),
            ResetReason::NotAnObject => f.write_str("state is not a JSON object"),
            ResetReason::MissingProvider => f.write_str("provider field missing"),
            ResetReason::UnknownProvider(id) => write!(f, "unknown provider {id:?}"),
        }
    }
}

/// Outcome of reading a stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum Migration {
    Migrated(ActiveState),
    Reset(ResetReason),
}

/// Parse raw file contents and bring them to the current record shape.
///
/// `now` is used only when `updated_at` is missing or unparseable.
pub fn migrate_state(raw: &[u8], now: DateTime<Utc>) -> Migration {
    let value: Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(e) => return Migration::Reset(ResetReason::Malformed(e.to_string())),
    };
    let Value::Object(mut map) = value else {
        return Migration::Reset(ResetReason::NotAnObject);
    };

    let provider_id = string_field(&map, "provider");
    if provider_id.is_empty() {
        return Migration::Reset(ResetReason::MissingProvider);
    }
    let Ok(provider) = providers::lookup(&provider_id) else {
        return Migration::Reset(ResetReason::UnknownProvider(provider_id));
    };

    let model = string_field(&map, "model");
    let fallback = if model.is_empty() {
        provider.default_model.to_string()
    } else {
        model
    };
    let tier_model = |key: &str| match string_field(&map, key) {
        v if v.is_empty() => fallback.clone(),
        v => v,
    };

    let state = ActiveState {
        provider: provider_id.clone(),
        default_tier: string_field(&map, "default_tier")
            .parse::<Tier>()
            .unwrap_or_default(),
        model_opus: tier_model("model_opus"),
        model_sonnet: tier_model("model_sonnet"),
        model_haiku: tier_model("model_haiku"),
        model: fallback.clone(),
        base_url: Some(string_field(&map, "base_url")).filter(|url| !url.is_empty()),
        auth_token: string_field(&map, "auth_token"),
        updated_at: DateTime::parse_from_rfc3339(&string_field(&map, "updated_at"))
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now),
        extra: Map::new(),
    };

    map.retain(|key, _| !KNOWN_FIELDS.contains(&key.as_str()));
    Migration::Migrated(ActiveState { extra: map, ..state })
}

/// String value of `key`; missing, null and non-string values read as empty.
fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
