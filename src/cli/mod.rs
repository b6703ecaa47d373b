//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Load-test harness for document-to-Markdown transform services
#[derive(Parser, Debug)]
#[command(name = "mdload")]
#[command(version)]
#[command(about = "Drive concurrent uploads against a transform endpoint and report outcomes")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a load-test batch against the transform endpoint
    Run(RunArgs),

    /// Check service health
    Health(HealthArgs),

    /// Show supported environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Base URL of the transform service
    #[arg(short, long)]
    pub url: Option<String>,

    /// Path to the file uploaded as payload
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Filename sent with the multipart upload (defaults to the payload's name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Number of concurrent trials
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-trial timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// API key sent as the X-Apikey header
    #[arg(short, long)]
    pub api_key: Option<String>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save formatted results to file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to a JSON or YAML configuration file
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for health command
#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Base URL of the transform service
    #[arg(short, long)]
    pub url: Option<String>,

    /// Health probe timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "mdload",
            "run",
            "--url",
            "http://10.0.0.1:8000",
            "--payload",
            "sample.pdf",
            "--concurrency",
            "3",
            "--timeout-ms",
            "5000",
        ]);
        match args.command {
            Command::Run(run_args) => {
                assert_eq!(run_args.url.as_deref(), Some("http://10.0.0.1:8000"));
                assert_eq!(run_args.payload.as_deref(), Some("sample.pdf"));
                assert_eq!(run_args.concurrency, Some(3));
                assert_eq!(run_args.timeout_ms, Some(5000));
                assert!(run_args.format.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_health_args() {
        let args = Args::parse_from([
            "mdload",
            "health",
            "--url",
            "http://svc:8000",
            "--timeout-ms",
            "2000",
            "--verbose",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Health(health_args) => {
                assert_eq!(health_args.url.as_deref(), Some("http://svc:8000"));
                assert_eq!(health_args.timeout_ms, Some(2000));
            }
            _ => panic!("Expected Health command"),
        }
    }

    #[test]
    fn test_health_args_timeout_default() {
        let args = Args::parse_from(["mdload", "health"]);
        match args.command {
            Command::Health(health_args) => {
                // Unset on the CLI so env and the built-in default can apply
                assert!(health_args.timeout_ms.is_none());
            }
            _ => panic!("Expected Health command"),
        }
    }
}
