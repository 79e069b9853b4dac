//! Input username loading and sanitization.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{error, warn};

static RE_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid username regex"));

/// Load raw usernames from a JSON file.
///
/// Accepts an array whose elements are either plain strings or objects with
/// a `username` field. Anything unreadable yields an empty list (logged);
/// callers treat an empty list as fatal.
pub fn load_inputs(path: &Path) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read input file");
            return Vec::new();
        }
    };

    let data: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to decode input JSON");
            return Vec::new();
        }
    };

    let Value::Array(items) = data else {
        error!(path = %path.display(), "Input JSON must be a list of usernames or objects");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => match obj.get("username")? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
            _ => None,
        })
        .collect()
}

/// Trim whitespace and `@`, lower-case, validate, and dedupe preserving
/// first-seen order. Invalid usernames are dropped with a warning.
pub fn sanitize_usernames<S: AsRef<str>>(usernames: &[S]) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::new();

    for raw in usernames {
        let username = raw.as_ref().trim().trim_matches('@').to_lowercase();
        if username.is_empty() {
            continue;
        }
        if !RE_USERNAME.is_match(&username) {
            warn!(username = username.as_str(), "Skipping invalid username");
            continue;
        }
        if !sanitized.contains(&username) {
            sanitized.push(username);
        }
    }

    sanitized
}
