use std::io::Write;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use terminal_status::cli::Args;
use terminal_status::config::Config;
use terminal_status::report::report_terminals;
use terminal_status::services::{DirectoryClient, NominatimGeocoder, TimeApiTimezoneLookup};
use terminal_status::AvailabilityEvaluator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let client = config
        .http_client()
        .context("Failed to create HTTP client")?;

    let directory = DirectoryClient::new(client.clone(), config.directory_url.clone());
    let mut evaluator = AvailabilityEvaluator::new(
        NominatimGeocoder::new(client.clone(), config.geocoder_url.clone()),
        TimeApiTimezoneLookup::new(client, config.timezone_url.clone()),
    )
    .with_week_start(config.week_start);

    let now = Local::now().fixed_offset();
    let mut stdout = std::io::stdout().lock();

    let summary = report_terminals(&args.terminal_ids, &directory, &mut evaluator, now, &mut stdout)
        .await
        .context("Failed to write report")?;
    stdout.flush()?;

    info!(
        "Checked {} terminal(s), {} failed",
        summary.processed, summary.failed
    );

    Ok(())
}
