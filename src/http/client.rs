//! Transform service client
//!
//! Wraps reqwest for the two routes the harness talks to: `GET /health` and
//! `POST /transform` (multipart upload). Non-200 responses are returned as data,
//! not errors; outcome classification belongs to the harness runner.

#![allow(dead_code)]

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Transport-level client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Connect timeout to {0}")]
    Timeout(String),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Successful conversion body returned by the transform endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformResponse {
    pub markdown: String,
    pub title: Option<String>,
}

/// Health endpoint body
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Raw reply from the transform endpoint, whatever the status
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformReply {
    pub status_code: u16,
    pub body: String,
    pub duration_ms: u64,
}

impl TransformReply {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Decode the success body. Returns None when the body is not the expected
    /// `{"markdown": ..., "title": ...}` shape.
    pub fn parse_markdown(&self) -> Option<TransformResponse> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Client for a transform service instance
#[derive(Clone)]
pub struct TransformClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl TransformClient {
    /// Create a client for the given base URL.
    ///
    /// No total request timeout is set by default: the harness enforces the
    /// per-trial deadline itself so that `TimedOut` has a single source. Only
    /// a connect timeout bounds socket establishment. Callers outside the
    /// harness (the health probe) opt in via [`with_timeout`](Self::with_timeout).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: None,
        })
    }

    /// Attach an API key sent as the X-Apikey header on every request
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Bound every request by a total timeout, connection through body
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(url.to_string())
        } else if e.is_connect() {
            ClientError::ConnectionRefused(url.to_string())
        } else if e.is_builder() {
            ClientError::InvalidUrl(url.to_string())
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }

    /// Check service health via GET /health
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.url("/health");
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_error(&url, e))?;

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))
    }

    /// Upload the payload to POST /transform as a multipart body.
    ///
    /// The payload travels under the form field `file` with the configured
    /// filename. `Bytes` keeps the shared buffer reference-counted, so no
    /// copy is made per request. Any received HTTP status produces an Ok
    /// reply carrying the status and body text; only transport failures are
    /// errors.
    pub async fn transform(
        &self,
        payload: Bytes,
        filename: &str,
    ) -> Result<TransformReply, ClientError> {
        let url = self.url("/transform");
        debug!("POST {} ({} bytes as {})", url, payload.len(), filename);

        let length = payload.len() as u64;
        let part = Part::stream_with_length(Body::from(payload), length)
            .file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("X-Apikey", key);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| self.map_error(&url, e))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!("Response: {} in {}ms", status_code, duration_ms);

        Ok(TransformReply {
            status_code,
            body,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = TransformClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/transform"), "http://localhost:8000/transform");
    }

    #[test]
    fn test_reply_success() {
        let reply = TransformReply {
            status_code: 200,
            body: r##"{"markdown":"# Title","title":"Title"}"##.to_string(),
            duration_ms: 12,
        };
        assert!(reply.is_success());

        let parsed = reply.parse_markdown().unwrap();
        assert_eq!(parsed.markdown, "# Title");
        assert_eq!(parsed.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_reply_null_title() {
        let reply = TransformReply {
            status_code: 200,
            body: r#"{"markdown":"text","title":null}"#.to_string(),
            duration_ms: 5,
        };
        let parsed = reply.parse_markdown().unwrap();
        assert!(parsed.title.is_none());
    }

    #[test]
    fn test_reply_non_json_body() {
        let reply = TransformReply {
            status_code: 415,
            body: "Unsupported file format".to_string(),
            duration_ms: 3,
        };
        assert!(!reply.is_success());
        assert!(reply.parse_markdown().is_none());
    }

    #[test]
    fn test_health_status() {
        let ok: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(ok.is_ok());

        let degraded = HealthStatus {
            status: "degraded".to_string(),
        };
        assert!(!degraded.is_ok());
    }
}
