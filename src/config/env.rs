//! Environment variable configuration
//!
//! Provides MDLOAD_* environment variable overrides for configuration.

#![allow(dead_code)]

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "MDLOAD";

/// Configuration read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from MDLOAD_URL
    pub base_url: Option<String>,
    /// Payload path from MDLOAD_PAYLOAD
    pub payload_path: Option<String>,
    /// Upload filename from MDLOAD_FILENAME
    pub filename: Option<String>,
    /// Concurrency from MDLOAD_CONCURRENCY
    pub concurrency: Option<usize>,
    /// Per-trial timeout from MDLOAD_TIMEOUT_MS
    pub timeout_ms: Option<u64>,
    /// API key from MDLOAD_API_KEY
    pub api_key: Option<String>,
    /// Output format from MDLOAD_FORMAT
    pub format: Option<String>,
    /// Config file from MDLOAD_CONFIG
    pub config_file: Option<String>,
    /// Verbose from MDLOAD_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("URL"),
            payload_path: get_env("PAYLOAD"),
            filename: get_env("FILENAME"),
            concurrency: get_env_parse("CONCURRENCY"),
            timeout_ms: get_env_parse("TIMEOUT_MS"),
            api_key: get_env("API_KEY"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.payload_path.is_some()
            || self.filename.is_some()
            || self.concurrency.is_some()
            || self.timeout_ms.is_some()
            || self.api_key.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_URL"), url.into()));
        self
    }

    /// Set payload path
    pub fn payload_path(mut self, path: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PAYLOAD"), path.into()));
        self
    }

    /// Set concurrency
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_CONCURRENCY"), concurrency.to_string()));
        self
    }

    /// Set per-trial timeout
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TIMEOUT_MS"), timeout_ms.to_string()));
        self
    }

    /// Set API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_API_KEY"), key.into()));
        self
    }

    /// Set verbose
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all MDLOAD environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_URL          Base URL of the transform service");
    println!("  {ENV_PREFIX}_PAYLOAD      Path to the payload file");
    println!("  {ENV_PREFIX}_FILENAME     Filename sent with the upload");
    println!("  {ENV_PREFIX}_CONCURRENCY  Number of concurrent trials");
    println!("  {ENV_PREFIX}_TIMEOUT_MS   Per-trial deadline in milliseconds");
    println!("  {ENV_PREFIX}_API_KEY      X-Apikey header value");
    println!("  {ENV_PREFIX}_FORMAT       Output format (table, json, csv)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE      Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_URL=http://10.0.0.100:8000");
    println!("  export {ENV_PREFIX}_CONCURRENCY=8");
    println!("  mdload run --payload sample.pdf");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.base_url.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .base_url("http://10.0.0.1:8000")
            .concurrency(4)
            .timeout_ms(3000)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.base_url, Some("http://10.0.0.1:8000".to_string()));
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.timeout_ms, Some(3000));
        assert!(config.has_any());
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().verbose(true).apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.verbose, Some(true));
    }
}
