pub mod error;

pub use error::{InstagramError, Result};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Error bodies are often full HTML pages; keep only the head of them.
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct InstagramClient {
    client: reqwest::Client,
    base_url: String,
}

impl InstagramClient {
    /// Build a client against `base_url`. `user_agent` falls back to
    /// [`DEFAULT_USER_AGENT`] when `None`.
    pub fn new(base_url: &str, timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .default_headers(headers)
            .build()
            .map_err(|e| InstagramError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public profile endpoint for a username.
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{}/?__a=1&__d=dis", self.base_url, username)
    }

    /// Fetch the profile JSON blob for `username`.
    ///
    /// Only HTTP 200 with a well-formed JSON body is a success. Any other
    /// status comes back as [`InstagramError::Api`], transport failures as
    /// [`InstagramError::Network`] and undecodable bodies as
    /// [`InstagramError::Parse`].
    pub async fn fetch_profile_json(&self, username: &str) -> Result<Value> {
        let url = self.profile_url(username);
        debug!(username, url = url.as_str(), "Fetching profile JSON");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        Ok(json)
    }
}
