//! Run summary formatters
//!
//! Renders run summaries as tables, JSON, CSV, or a single summary line.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::path::Path;

use crate::harness::LatencyStats;
use crate::models::{RunSummary, Trial, TrialOutcome};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Run summary formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => self.format_summary_csv(summary),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn outcome_cell(&self, outcome: &TrialOutcome) -> String {
        let label = outcome.label();
        if !self.colorize {
            return format!("{} {}", outcome.symbol(), label);
        }

        match outcome {
            TrialOutcome::Success => format!("\x1b[32m✓ {label}\x1b[0m"),
            TrialOutcome::HttpError { .. } => format!("\x1b[31m✗ {label}\x1b[0m"),
            TrialOutcome::TransportError { .. } => format!("\x1b[31m! {label}\x1b[0m"),
            TrialOutcome::TimedOut => format!("\x1b[33m⏱ {label}\x1b[0m"),
        }
    }

    fn format_trial_row(&self, trial: &Trial) -> String {
        let mut row = format!(
            "  {:3}  {:16} [{:>7}ms]",
            trial.index,
            self.outcome_cell(&trial.outcome),
            trial.elapsed_ms
        );

        match &trial.outcome {
            TrialOutcome::HttpError { body, .. } if !body.is_empty() => {
                let snippet: String = body.chars().take(60).collect();
                row.push_str(&format!("  {snippet}"));
            }
            TrialOutcome::TransportError { cause } => {
                row.push_str(&format!("  {cause}"));
            }
            _ => {}
        }

        row
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\nTrial Results\n");
        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        for trial in &summary.trials {
            output.push_str(&self.format_trial_row(trial));
            output.push('\n');
        }
        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        output.push_str(&format!(
            "Attempted: {} | Succeeded: {} | Failed: {}\n",
            summary.attempted,
            summary.succeeded,
            summary.failed()
        ));
        output.push_str(&format!(
            "Success Rate: {:.1}% | Duration: {}ms\n",
            summary.success_rate(),
            summary.total_duration_ms
        ));

        let stats = LatencyStats::from_summary(summary);
        if stats.count > 0 {
            output.push_str(&format!("Latency: {}\n", stats.format_summary()));
        }

        output
    }

    fn format_summary_csv(&self, summary: &RunSummary) -> String {
        let mut output = String::from("index,outcome,elapsed_ms,detail\n");

        for trial in &summary.trials {
            let detail = match &trial.outcome {
                TrialOutcome::HttpError { body, .. } => body.clone(),
                TrialOutcome::TransportError { cause } => cause.clone(),
                _ => String::new(),
            };
            output.push_str(&format!(
                "{},{},{},\"{}\"\n",
                trial.index,
                trial.outcome.label(),
                trial.elapsed_ms,
                detail.replace('"', "\"\"")
            ));
        }

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!("{summary}")
    }

    /// Write the formatted summary to a file
    pub fn save_summary(&self, summary: &RunSummary, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.format_summary(summary);
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write output file {}", path.display()))
    }
}
