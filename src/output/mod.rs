//! Output formatting for run summaries
//!
//! Provides Table, JSON, CSV, and one-line summary formats.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
