//! Batch pipeline: usernames → fetch → extract → cap → normalize → records.
//!
//! Usernames are processed strictly one at a time, in input order, with a
//! fixed politeness delay after each fetch. A failing user never aborts the
//! batch; it just contributes no records.

pub mod stats;

pub use stats::PipelineStats;

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::extractor::extract_following_nodes;
use crate::inputs::sanitize_usernames;
use crate::normalizer::normalize;
use crate::traits::ProfileFetcher;
use crate::types::ProfileRecord;

/// Pause after every per-user fetch. Not adaptive.
pub const POLITENESS_DELAY: Duration = Duration::from_millis(500);

/// Record count per `followed_by` username.
pub type Summary = BTreeMap<String, usize>;

#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub records: Vec<ProfileRecord>,
    pub summary: Summary,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct FollowingPipeline<'a> {
    fetcher: &'a dyn ProfileFetcher,
    max_following: usize,
    delay: Duration,
}

impl<'a> FollowingPipeline<'a> {
    pub fn new(fetcher: &'a dyn ProfileFetcher, max_following: usize) -> Self {
        Self {
            fetcher,
            max_following,
            delay: POLITENESS_DELAY,
        }
    }

    pub fn from_config(fetcher: &'a dyn ProfileFetcher, config: &ScraperConfig) -> Self {
        Self::new(fetcher, config.max_following)
    }

    /// Override the politeness delay (tests run with `Duration::ZERO`).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run<S: AsRef<str>>(&self, usernames: &[S]) -> PipelineOutput {
        let usernames = sanitize_usernames(usernames);
        info!(count = usernames.len(), "Starting scrape");

        let mut records = Vec::new();
        let mut stats = PipelineStats::default();

        for username in &usernames {
            self.scrape_user(username, &mut records, &mut stats).await;
            tokio::time::sleep(self.delay).await;
        }

        let summary = summarize(&records);
        stats.records = records.len();
        info!(total = records.len(), users = summary.len(), "Scrape finished");

        PipelineOutput {
            records,
            summary,
            stats,
        }
    }

    async fn scrape_user(
        &self,
        username: &str,
        records: &mut Vec<ProfileRecord>,
        stats: &mut PipelineStats,
    ) {
        stats.users_processed += 1;
        info!(username, "Fetching following list");

        let payload = match self.fetcher.profile_json(username).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(username, error = %e, "No profile JSON returned, skipping user");
                stats.users_failed += 1;
                return;
            }
        };

        let nodes = extract_following_nodes(&payload);
        info!(username, count = nodes.len(), "Profile JSON contained following entries");
        stats.nodes_seen += nodes.len();

        if nodes.is_empty() {
            stats.users_empty += 1;
            return;
        }

        let dropped = nodes.len().saturating_sub(self.max_following);
        if dropped > 0 {
            info!(
                username,
                max_following = self.max_following,
                dropped,
                "Reached max_following, truncating results"
            );
            stats.nodes_truncated += dropped;
        }

        let before = records.len();
        for node in nodes.into_iter().take(self.max_following) {
            match normalize(node, username) {
                Ok(record) => records.push(record),
                Err(e) => {
                    error!(username, error = %e, "Failed to parse following node");
                    stats.nodes_malformed += 1;
                }
            }
        }

        info!(username, count = records.len() - before, "Fetched following profiles");
    }
}

/// Count records per non-empty `followed_by`.
pub fn summarize(records: &[ProfileRecord]) -> Summary {
    let mut summary = Summary::new();
    for record in records.iter().filter(|r| !r.followed_by.is_empty()) {
        *summary.entry(record.followed_by.clone()).or_insert(0) += 1;
    }
    summary
}
