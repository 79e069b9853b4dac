// Test mocks for the following pipeline.
//
// MockFetcher (ProfileFetcher): HashMap-based username → payload, plus
// payload builders for the graphql edge shape and a record builder.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::ProfileFetcher;
use crate::types::ProfileRecord;

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Returns `Err` for unregistered usernames, like a 404 from the live endpoint.
/// Builder pattern: `.on_profile()`, `.on_status()`.
pub struct MockFetcher {
    profiles: HashMap<String, Value>,
    statuses: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            statuses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_profile(mut self, username: &str, payload: Value) -> Self {
        self.profiles.insert(username.to_string(), payload);
        self
    }

    /// Fail the fetch for `username` with the given HTTP status.
    pub fn on_status(mut self, username: &str, status: u16) -> Self {
        self.statuses.insert(username.to_string(), status);
        self
    }

    /// Usernames fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileFetcher for MockFetcher {
    async fn profile_json(&self, username: &str) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(username.to_string());
        }
        if let Some(status) = self.statuses.get(username) {
            bail!("API error (status {status}): mock failure for {username}");
        }
        match self.profiles.get(username) {
            Some(payload) => Ok(payload.clone()),
            None => bail!("API error (status 404): no mock profile for {username}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// A following node with just an id and username.
pub fn node(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "full_name": format!("{username} full name"),
        "is_private": false,
        "is_verified": false,
    })
}

/// Wrap nodes in the `graphql.user.edge_follow.edges` envelope.
pub fn following_payload(nodes: Vec<Value>) -> Value {
    let count = nodes.len();
    let edges: Vec<Value> = nodes.into_iter().map(|n| json!({ "node": n })).collect();
    json!({
        "graphql": {
            "user": {
                "edge_follow": { "count": count, "edges": edges }
            }
        }
    })
}

/// Payload following `n` generated accounts named `{prefix}_{i}`.
pub fn numbered_payload(prefix: &str, n: usize) -> Value {
    following_payload(
        (0..n)
            .map(|i| node(&format!("{prefix}-{i}"), &format!("{prefix}_{i}")))
            .collect(),
    )
}

/// A normalized record as the pipeline would produce it for `node(id, username)`.
pub fn record(id: &str, username: &str, followed_by: &str) -> ProfileRecord {
    ProfileRecord {
        id: id.to_string(),
        full_name: format!("{username} full name"),
        is_private: false,
        fbid_v2: None,
        profile_pic_id: None,
        profile_pic_url: None,
        is_verified: false,
        username: username.to_string(),
        latest_reel_media: None,
        followed_by: followed_by.to_string(),
    }
}
