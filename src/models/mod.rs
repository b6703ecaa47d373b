//! Data models for harness runs
//!
//! Defines trials, outcomes, and run summaries.

mod trial;

pub use trial::{RunSummary, Trial, TrialOutcome};
