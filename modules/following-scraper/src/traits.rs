// Fetch abstraction for the pipeline. The live implementation is the
// Instagram client; tests use `testing::MockFetcher`.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use instagram_client::InstagramClient;

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch the profile JSON payload for a username. Any error means
    /// "no data" for that user.
    async fn profile_json(&self, username: &str) -> Result<Value>;
}

#[async_trait]
impl ProfileFetcher for InstagramClient {
    async fn profile_json(&self, username: &str) -> Result<Value> {
        Ok(self.fetch_profile_json(username).await?)
    }
}
