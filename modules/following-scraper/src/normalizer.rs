//! Raw following node → [`ProfileRecord`].
//!
//! Instagram has renamed and retyped these fields over the years, so every
//! lookup here is tolerant: missing or oddly typed values fall back to a
//! default instead of failing the node. The only hard failure is a node
//! that is not a JSON object at all.

use serde_json::{Map, Value};

use crate::error::{Result, ScraperError};
use crate::types::ProfileRecord;

/// Primary key candidates, highest priority first.
const ID_ALIASES: &[&str] = &["id", "pk", "pk_id", "strong_id__"];

pub fn normalize(node: &Value, followed_by: &str) -> Result<ProfileRecord> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScraperError::MalformedNode(json_type_name(node)))?;

    Ok(ProfileRecord {
        id: resolve_id(obj),
        full_name: string_field(obj, "full_name"),
        is_private: obj.get("is_private").is_some_and(is_truthy),
        fbid_v2: obj.get("fbid_v2").and_then(coerce_i64),
        profile_pic_id: obj.get("profile_pic_id").and_then(scalar_string),
        profile_pic_url: obj
            .get("profile_pic_url")
            .and_then(Value::as_str)
            .map(str::to_owned),
        is_verified: obj.get("is_verified").is_some_and(is_truthy),
        username: string_field(obj, "username"),
        latest_reel_media: obj.get("latest_reel_media").and_then(coerce_i64),
        followed_by: followed_by.to_string(),
    })
}

fn resolve_id(obj: &Map<String, Value>) -> String {
    ID_ALIASES
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_default()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Best-effort integer coercion. Anything that doesn't cleanly become an
/// `i64` is `None`.
pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
