//! mdload - Load-test harness for document-to-Markdown transform services
//!
//! Drives N concurrent upload trials against a transform endpoint, bounds each
//! trial by its own deadline, and reports per-trial outcomes plus an aggregate
//! success count.
//!
//! ## Usage
//!
//! ```bash
//! # Single trial with a two-minute deadline (the default)
//! mdload run --url http://10.0.0.1:8000 --payload sample.pdf
//!
//! # Three concurrent trials, 5s deadline each, JSON output
//! mdload run --url http://10.0.0.1:8000 --payload sample.pdf \
//!     --concurrency 3 --timeout-ms 5000 --format json
//!
//! # Check the service before a run
//! mdload health --url http://10.0.0.1:8000
//! ```

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod harness;
mod http;
mod models;
mod output;
mod utils;

use cli::Args;
use config::{EnvConfig, HarnessConfig, DEFAULT_HEALTH_TIMEOUT_MS};
use harness::HarnessRunner;
use http::TransformClient;
use models::RunSummary;
use output::{OutputFormat, ResultFormatter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let verbose = args.verbose || env.verbose.unwrap_or(false);

    FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    let code = match args.command {
        cli::Command::Run(run_args) => run_harness(run_args, &env).await?,
        cli::Command::Health(health_args) => check_health(health_args, &env).await?,
        cli::Command::Env => {
            config::env::print_env_help();
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

/// Exit code for a finished run: failure when any trial failed
fn run_exit_code(summary: &RunSummary) -> ExitCode {
    if summary.is_all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Resolve configuration (CLI > env > file > defaults) and run the batch
async fn run_harness(args: cli::RunArgs, env: &EnvConfig) -> Result<ExitCode> {
    let config_file = args.config.clone().or_else(|| env.config_file.clone());

    let mut config = match config_file {
        Some(path) => HarnessConfig::load(&path)?,
        None => HarnessConfig::default(),
    }
    .apply_env(env);

    if let Some(url) = args.url {
        config = config.with_base_url(url);
    }
    if let Some(payload) = args.payload {
        config = config.with_payload_path(payload);
    }
    if let Some(filename) = args.filename {
        config = config.with_filename(filename);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(api_key) = args.api_key {
        config = config.with_api_key(api_key);
    }

    let format_name = args
        .format
        .clone()
        .or_else(|| env.format.clone())
        .unwrap_or_else(|| "table".to_string());
    let format = OutputFormat::from_str(&format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format_name}"))?;
    let formatter = ResultFormatter::new(format);

    let runner = HarnessRunner::new(config)?;
    let summary = runner.run().await?;

    println!("{}", formatter.format_summary(&summary));

    if let Some(path) = args.output {
        formatter.save_summary(&summary, &path)?;
        info!("Results saved to {}", path);
    }

    Ok(run_exit_code(&summary))
}

/// Probe GET /health under a deadline; non-zero exit when unhealthy
async fn check_health(args: cli::HealthArgs, env: &EnvConfig) -> Result<ExitCode> {
    let url = args
        .url
        .or_else(|| env.base_url.clone())
        .unwrap_or_else(|| HarnessConfig::default().base_url);

    let timeout_ms = args
        .timeout_ms
        .or(env.timeout_ms)
        .unwrap_or(DEFAULT_HEALTH_TIMEOUT_MS);

    let client = TransformClient::new(&url)?.with_timeout(Duration::from_millis(timeout_ms));

    match client.health().await {
        Ok(status) if status.is_ok() => {
            println!("✓ {url} is healthy");
            Ok(ExitCode::SUCCESS)
        }
        Ok(status) => {
            println!("✗ {url} reported status: {}", status.status);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            println!("✗ {url} is unreachable: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
