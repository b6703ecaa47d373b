//! Load harness execution
//!
//! Drives concurrent trials against the transform endpoint and aggregates
//! their outcomes.

mod runner;
mod stats;

pub use runner::{load_payload, HarnessRunner};
pub use stats::{LatencyStats, Percentiles};
