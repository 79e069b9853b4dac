//! Command-line surface and the run flow behind it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use instagram_client::InstagramClient;

use crate::config::{data_dir, OutputFormat, ScraperConfig, Settings};
use crate::exporter::{export_run, ExportReport};
use crate::inputs::{load_inputs, sanitize_usernames};
use crate::pipeline::FollowingPipeline;

/// Extract following lists for a batch of Instagram usernames.
#[derive(Parser, Debug, Clone)]
#[command(name = "following-scraper")]
pub struct Cli {
    /// JSON file with usernames (default: $DATA_DIR/inputs.sample.json)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON output file; CSV and summary files are written next to it
    /// (default: $DATA_DIR/sample_output.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum following profiles per user, overrides settings
    #[arg(long)]
    pub max_following: Option<usize>,

    /// Output format, overrides settings
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Settings JSON file
    #[arg(short, long, default_value = "config/settings.json")]
    pub settings: PathBuf,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing usable in the input file. The only outcome that fails the process.
    NoValidUsernames,
    /// Every user was processed but no records came back.
    NothingToExport,
    Exported(ExportReport),
}

impl RunOutcome {
    pub fn exit_status(&self) -> u8 {
        match self {
            RunOutcome::NoValidUsernames => 1,
            RunOutcome::NothingToExport | RunOutcome::Exported(_) => 0,
        }
    }
}

/// Load settings and inputs, scrape, export.
///
/// `delay` is the pause after each user; the binary passes
/// [`crate::pipeline::POLITENESS_DELAY`].
pub async fn run(cli: Cli, delay: Duration) -> Result<RunOutcome> {
    info!(path = %cli.settings.display(), "Loading settings");
    let settings = Settings::load(&cli.settings);
    let config =
        ScraperConfig::from_settings(&settings).with_overrides(cli.max_following, cli.format);
    config.log_summary();

    let input_path = cli.input.unwrap_or_else(|| data_dir().join("inputs.sample.json"));
    let output_path = cli.output.unwrap_or_else(|| data_dir().join("sample_output.json"));
    info!(input = %input_path.display(), output = %output_path.display(), "Resolved paths");

    let usernames = sanitize_usernames(&load_inputs(&input_path));
    if usernames.is_empty() {
        error!("No valid usernames found in input file");
        return Ok(RunOutcome::NoValidUsernames);
    }

    let client = InstagramClient::new(
        &config.base_url,
        config.request_timeout,
        config.user_agent.as_deref(),
    )?;
    let output = FollowingPipeline::from_config(&client, &config)
        .with_delay(delay)
        .run(&usernames)
        .await;
    info!("{}", output.stats);

    let outcome = match export_run(
        &output.records,
        &output.summary,
        &output_path,
        config.output_format,
    )? {
        Some(report) => {
            info!(
                records = report.records,
                summary = %report.summary_path.display(),
                "Export complete"
            );
            RunOutcome::Exported(report)
        }
        None => RunOutcome::NothingToExport,
    };

    info!("Scraping complete");
    Ok(outcome)
}
