use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use following_scraper::app::{self, Cli};
use following_scraper::pipeline::POLITENESS_DELAY;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("following_scraper=info".parse()?)
                .add_directive("instagram_client=info".parse()?),
        )
        .init();

    let outcome = app::run(Cli::parse(), POLITENESS_DELAY).await?;
    Ok(ExitCode::from(outcome.exit_status()))
}
