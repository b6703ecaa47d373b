//! Configuration module
//!
//! Handles harness configuration from file, environment, and CLI.

pub mod env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use env::EnvConfig;

/// Default per-trial deadline: the reference setup allows conversions to take
/// up to two minutes.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Default health probe deadline; a health check should answer fast
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;

/// Harness configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL of the transform service
    pub base_url: String,

    /// Path to the local file uploaded as payload
    pub payload_path: String,

    /// Filename sent with the multipart part (defaults to the payload's
    /// file name when unset)
    pub filename: Option<String>,

    /// Number of concurrent trials
    pub concurrency: usize,

    /// Per-trial deadline in milliseconds
    pub timeout_ms: u64,

    /// Optional X-Apikey header value
    pub api_key: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            payload_path: String::new(),
            filename: None,
            concurrency: 1,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a JSON or YAML file (by extension)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Set base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set payload path
    pub fn with_payload_path(mut self, path: impl Into<String>) -> Self {
        self.payload_path = path.into();
        self
    }

    /// Set upload filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set per-trial timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Apply environment variable overrides (env wins over file values)
    pub fn apply_env(mut self, env: &EnvConfig) -> Self {
        if let Some(url) = &env.base_url {
            self.base_url = url.clone();
        }
        if let Some(path) = &env.payload_path {
            self.payload_path = path.clone();
        }
        if let Some(filename) = &env.filename {
            self.filename = Some(filename.clone());
        }
        if let Some(concurrency) = env.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(timeout_ms) = env.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(key) = &env.api_key {
            self.api_key = Some(key.clone());
        }
        self
    }

    /// Filename used in the multipart part: the explicit setting, else the
    /// payload path's final component, else a generic fallback.
    pub fn effective_filename(&self) -> String {
        if let Some(filename) = &self.filename {
            return filename.clone();
        }

        Path::new(&self.payload_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "payload.bin".to_string())
    }
}
