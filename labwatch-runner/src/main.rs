//! Labwatch Runner
//!
//! Launches one SSL Labs analysis per host given on the command line, polls
//! each until it is ready or expired, and relays every result to a webhook.
//!
//! Architecture:
//! - Configuration: timings from environment, destinations from the CLI
//! - Repositories: scan API and webhook access (via labwatch-client)
//! - Services: message formatting and run summary
//! - Scheduler: per-host job runners, result queue, reporter
//!
//! The process exits once the reporter has handled one result per host.

mod cli;
mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use labwatch_client::{ScanApiClient, WebhookClient};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;
use crate::repository::{HttpScanRepository, WebhookNotifier};
use crate::scheduler::ScanDriver;
use crate::service::SlackFormatter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labwatch_runner=info,labwatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let hosts = cli.normalized_hosts();

    if hosts.is_empty() {
        info!("No hosts given, exiting");
        return Ok(());
    }

    let config = Config::from_env(cli.api_url, cli.webhook_url);
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: api_url={}, delivery_enabled={}",
        config.api_url,
        config.delivery_enabled()
    );
    info!(
        "Fetch timeout: {:?}, poll interval: {:?}, start delay: {:?}, launch backoff: {:?} x{}",
        config.fetch_timeout,
        config.poll_interval,
        config.start_delay,
        config.launch_backoff,
        config.launch_retries
    );

    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let repository = Arc::new(HttpScanRepository::new(ScanApiClient::with_client(
        config.api_url.clone(),
        http_client.clone(),
    )));
    let notifier = Arc::new(WebhookNotifier::new(
        config
            .webhook_url
            .clone()
            .map(|url| WebhookClient::with_client(url, http_client)),
    ));
    let formatter = Arc::new(SlackFormatter::new(config.report_url.clone()));

    let driver = ScanDriver::new(config, repository, formatter, notifier);
    let summary = driver.run(hosts).await?;

    summary.print();

    Ok(())
}
