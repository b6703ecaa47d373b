//! Latency statistics over trial durations
//!
//! Percentiles and summary statistics computed from per-trial elapsed times.

use serde::{Deserialize, Serialize};

use crate::models::RunSummary;

/// Latency percentiles (p50, p90, p95, p99)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Percentiles {
    /// 50th percentile (median)
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

impl Percentiles {
    /// Calculate percentiles from sorted latencies (in milliseconds)
    pub fn from_sorted(latencies: &[f64]) -> Self {
        if latencies.is_empty() {
            return Self::default();
        }

        Self {
            p50: percentile(latencies, 50.0),
            p90: percentile(latencies, 90.0),
            p95: percentile(latencies, 95.0),
            p99: percentile(latencies, 99.0),
        }
    }
}

/// Calculate percentile value from sorted array
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let fraction = idx - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Latency statistics over a batch of trials
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Minimum latency in milliseconds
    pub min: f64,
    /// Maximum latency in milliseconds
    pub max: f64,
    /// Mean latency in milliseconds
    pub mean: f64,
    /// Standard deviation in milliseconds
    pub std_dev: f64,
    /// Latency percentiles
    pub percentiles: Percentiles,
    /// Total number of samples
    pub count: usize,
}

impl LatencyStats {
    /// Calculate statistics from latency samples (in milliseconds)
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let sum: f64 = sorted.iter().sum();
        let mean = sum / sorted.len() as f64;

        let variance: f64 =
            sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / sorted.len() as f64;
        let std_dev = variance.sqrt();

        let percentiles = Percentiles::from_sorted(&sorted);

        Self {
            min,
            max,
            mean,
            std_dev,
            percentiles,
            count: sorted.len(),
        }
    }

    /// Calculate statistics from a run summary's trial durations
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self::from_samples(&summary.elapsed_samples())
    }

    /// Format as summary string
    pub fn format_summary(&self) -> String {
        format!(
            "min={:.0}ms max={:.0}ms mean={:.1}ms std={:.1}ms p50={:.0}ms p95={:.0}ms p99={:.0}ms",
            self.min,
            self.max,
            self.mean,
            self.std_dev,
            self.percentiles.p50,
            self.percentiles.p95,
            self.percentiles.p99
        )
    }
}
