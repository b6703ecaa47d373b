//! Trial and run summary models
//!
//! A trial is one independent request attempt within a load-test batch; a run
//! summary is the aggregate computed after every trial reaches a terminal state.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a single trial
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialOutcome {
    /// HTTP 200 received
    Success,
    /// Any other HTTP status received
    HttpError { status: u16, body: String },
    /// Connection-level failure (refused, DNS, reset, ...)
    TransportError { cause: String },
    /// Deadline exceeded before a response arrived
    TimedOut,
}

impl TrialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TrialOutcome::Success)
    }

    /// Short label for log lines and table output
    pub fn label(&self) -> String {
        match self {
            TrialOutcome::Success => "200 OK".to_string(),
            TrialOutcome::HttpError { status, .. } => format!("HTTP {status}"),
            TrialOutcome::TransportError { .. } => "TRANSPORT".to_string(),
            TrialOutcome::TimedOut => "TIMEOUT".to_string(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TrialOutcome::Success => "✓",
            TrialOutcome::HttpError { .. } => "✗",
            TrialOutcome::TransportError { .. } => "!",
            TrialOutcome::TimedOut => "⏱",
        }
    }
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialOutcome::Success => write!(f, "success"),
            TrialOutcome::HttpError { status, body } => {
                let snippet: String = body.chars().take(120).collect();
                write!(f, "http error {status}: {snippet}")
            }
            TrialOutcome::TransportError { cause } => write!(f, "transport error: {cause}"),
            TrialOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// One request attempt within a batch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trial {
    /// 0-based ordinal among the batch
    pub index: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration from start to terminal outcome
    pub elapsed_ms: u64,
    pub outcome: TrialOutcome,
}

impl Trial {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trial {} [{}] {}ms",
            self.outcome.symbol(),
            self.index,
            self.outcome.label(),
            self.elapsed_ms
        )
    }
}

/// Aggregate over all trials in a batch, computed once every trial is terminal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration of the whole batch
    pub total_duration_ms: u64,
    pub trials: Vec<Trial>,
}

impl RunSummary {
    /// Build a summary from resolved trials. Success count is derived from the
    /// outcomes, never tallied incrementally while trials are in flight.
    pub fn new(
        trials: Vec<Trial>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        total_duration_ms: u64,
    ) -> Self {
        let attempted = trials.len();
        let succeeded = trials.iter().filter(|t| t.is_success()).count();

        Self {
            attempted,
            succeeded,
            started_at,
            finished_at,
            total_duration_ms,
            trials,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// Success rate as a percentage (0.0 - 100.0)
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.attempted as f64) * 100.0
        }
    }

    pub fn is_all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }

    /// Elapsed durations of all trials, in milliseconds
    pub fn elapsed_samples(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.elapsed_ms as f64).collect()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} trials succeeded ({:.1}%) in {}ms",
            self.succeeded,
            self.attempted,
            self.success_rate(),
            self.total_duration_ms
        )
    }
}
