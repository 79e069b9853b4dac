//! Locates the following nodes inside a profile JSON payload.

use serde_json::Value;

use crate::normalizer::is_truthy;

/// Known locations of the following edge list, tried in order. The first
/// path that yields any node wins.
const FOLLOWING_PATHS: &[&[&str]] = &[
    &["graphql", "user", "edge_follow", "edges"],
    &["data", "user", "edge_follow", "edges"],
];

/// Return the raw following nodes in edge order. An absent path at any
/// level is an empty result, not an error: the payload shape drifts and
/// plenty of accounts follow no one.
pub fn extract_following_nodes(payload: &Value) -> Vec<&Value> {
    FOLLOWING_PATHS
        .iter()
        .map(|path| nodes_at(payload, path))
        .find(|nodes| !nodes.is_empty())
        .unwrap_or_default()
}

fn nodes_at<'a>(payload: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    path.iter()
        .try_fold(payload, |value, key| value.get(*key).filter(|v| !v.is_null()))
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .filter(|node| is_truthy(node))
                .collect()
        })
        .unwrap_or_default()
}
