//! Harness runner
//!
//! Launches N independent trials as tokio tasks, bounds each by its own
//! deadline, joins the full set, and builds the run summary. No trial failure
//! is fatal to the run; only a missing or empty payload aborts before launch.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::http::{ClientError, TransformClient, TransformReply};
use crate::models::{RunSummary, Trial, TrialOutcome};
use crate::utils::format_elapsed;

/// Load the payload file, failing fast on a missing or empty file.
///
/// This is the harness's only fatal precondition: it runs once, before any
/// trial is spawned.
pub fn load_payload(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let payload = std::fs::read(path)
        .with_context(|| format!("Failed to read payload file {}", path.display()))?;

    if payload.is_empty() {
        bail!("Payload file {} is empty", path.display());
    }

    Ok(payload)
}

/// Classify a received HTTP reply into a terminal outcome
fn classify_reply(reply: TransformReply) -> TrialOutcome {
    if reply.is_success() {
        TrialOutcome::Success
    } else {
        TrialOutcome::HttpError {
            status: reply.status_code,
            body: reply.body,
        }
    }
}

/// Run one trial: build the multipart request, send it under the deadline,
/// and record the terminal outcome.
async fn run_trial(
    index: usize,
    client: TransformClient,
    payload: Bytes,
    filename: String,
    deadline: Duration,
) -> Trial {
    let started_at = Utc::now();
    let start = Instant::now();

    // Dropping the timed-out future abandons the in-flight request; it is
    // never awaited past the deadline.
    let result = timeout(deadline, client.transform(payload, &filename)).await;

    let elapsed = start.elapsed();
    let outcome = match result {
        Ok(Ok(reply)) => classify_reply(reply),
        Ok(Err(e)) => TrialOutcome::TransportError {
            cause: e.to_string(),
        },
        Err(_) => TrialOutcome::TimedOut,
    };

    if outcome.is_success() {
        info!(
            "trial {} finished in {} [{}]",
            index,
            format_elapsed(elapsed),
            outcome.label()
        );
    } else {
        warn!(
            "trial {} finished in {} [{}]: {}",
            index,
            format_elapsed(elapsed),
            outcome.label(),
            outcome
        );
    }

    Trial {
        index,
        started_at,
        finished_at: Utc::now(),
        elapsed_ms: elapsed.as_millis() as u64,
        outcome,
    }
}

/// Load harness: drives N concurrent trials with a shared read-only payload
pub struct HarnessRunner {
    config: HarnessConfig,
    client: TransformClient,
    // Reference-counted so every trial borrows the one loaded buffer
    payload: Bytes,
}

impl HarnessRunner {
    /// Create a runner, loading the payload from the configured path
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let payload = load_payload(&config.payload_path)?;
        Self::with_payload(config, payload)
    }

    /// Create a runner with an in-memory payload
    pub fn with_payload(config: HarnessConfig, payload: Vec<u8>) -> Result<Self> {
        if payload.is_empty() {
            bail!("Payload must not be empty");
        }
        if config.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }

        let mut client = TransformClient::new(&config.base_url)?;
        if let Some(key) = &config.api_key {
            client = client.with_api_key(key);
        }

        Ok(Self {
            config,
            client,
            payload: Bytes::from(payload),
        })
    }

    /// Check service health before a run
    pub async fn health(&self) -> Result<bool, ClientError> {
        let status = self.client.health().await?;
        Ok(status.is_ok())
    }

    /// Run the full batch and return the summary.
    ///
    /// Every spawned trial's handle is collected and awaited; the summary is
    /// only built after the last trial reaches a terminal state. Each trial's
    /// deadline starts at its own start timestamp.
    pub async fn run(&self) -> Result<RunSummary> {
        let n = self.config.concurrency;
        let filename = self.config.effective_filename();
        let deadline = Duration::from_millis(self.config.timeout_ms);

        info!(
            "Starting {} trial(s) against {} ({} bytes as {}, timeout {}ms)",
            n,
            self.client.base_url(),
            self.payload.len(),
            filename,
            self.config.timeout_ms
        );

        let started_at = Utc::now();
        let start = Instant::now();

        let mut handles = Vec::with_capacity(n);
        for index in 0..n {
            let client = self.client.clone();
            let payload = self.payload.clone();
            let filename = filename.clone();

            handles.push(tokio::spawn(run_trial(
                index, client, payload, filename, deadline,
            )));
        }

        // Join over the full set of tracked handles: the summary can only be
        // built once every launched trial has resolved.
        let joined = futures::future::join_all(handles).await;

        let mut trials = Vec::with_capacity(n);
        for (index, result) in joined.into_iter().enumerate() {
            match result {
                Ok(trial) => trials.push(trial),
                // A panicked task still counts as attempted
                Err(e) => {
                    warn!("trial {} task failed: {}", index, e);
                    let now = Utc::now();
                    trials.push(Trial {
                        index,
                        started_at,
                        finished_at: now,
                        elapsed_ms: start.elapsed().as_millis() as u64,
                        outcome: TrialOutcome::TransportError {
                            cause: format!("trial task panicked: {e}"),
                        },
                    });
                }
            }
        }

        let summary = RunSummary::new(
            trials,
            started_at,
            Utc::now(),
            start.elapsed().as_millis() as u64,
        );

        info!(
            "{} of {} trials succeeded in {}",
            summary.succeeded,
            summary.attempted,
            format_elapsed(start.elapsed())
        );

        Ok(summary)
    }
}


#[cfg(test)]
mod server_tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> HarnessConfig {
        HarnessConfig::default()
            .with_base_url(server.uri())
            .with_filename("sample.pdf")
            .with_timeout_ms(5000)
    }

    fn runner_with(config: HarnessConfig) -> HarnessRunner {
        HarnessRunner::with_payload(config, b"0123456789".to_vec()).unwrap()
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({"markdown": "# Title", "title": "Title"})
    }

    #[tokio::test]
    async fn test_all_trials_succeed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(3)
            .mount(&server)
            .await;

        let runner = runner_with(config_for(&server).with_concurrency(3));
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 3);
        assert!(summary.is_all_succeeded());
        assert_eq!(summary.trials.len(), 3);
        for (i, trial) in summary.trials.iter().enumerate() {
            assert_eq!(trial.index, i);
            assert_eq!(trial.outcome, TrialOutcome::Success);
        }
    }

    #[tokio::test]
    async fn test_api_key_header_forwarded() {
        let server = MockServer::start().await;
        // Only requests carrying the key match; a missing header would 404
        Mock::given(method("POST"))
            .and(path("/transform"))
            .and(header("x-apikey", "secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let config = config_for(&server).with_api_key("secret-key");
        let summary = runner_with(config).run().await.unwrap();

        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn test_http_error_recorded_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(415).set_body_string("Unsupported file format"))
            .mount(&server)
            .await;

        let summary = runner_with(config_for(&server)).run().await.unwrap();

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(
            summary.trials[0].outcome,
            TrialOutcome::HttpError {
                status: 415,
                body: "Unsupported file format".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_mixed_outcomes_counted_exactly() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(415).set_body_string("Unsupported file format"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let runner = runner_with(config_for(&server).with_concurrency(2));
        let summary = runner.run().await.unwrap();

        // Exactly one 415 and one 200, whichever trial drew which
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed(), 1);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = config_for(&server).with_timeout_ms(250);
        let start = Instant::now();
        let summary = runner_with(config).run().await.unwrap();

        assert_eq!(summary.trials[0].outcome, TrialOutcome::TimedOut);
        // Bounded by the deadline plus scheduling slack, never the full delay
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trials_run_concurrently() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body())
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        let runner = runner_with(config_for(&server).with_concurrency(3));
        let start = Instant::now();
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.succeeded, 3);
        // Three 400ms trials overlapping: total is near one delay, not three
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_connection_refused_does_not_abort_run() {
        // Bind then drop a listener so the port is free but unserved
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let config = HarnessConfig::default()
            .with_base_url(format!("http://127.0.0.1:{port}"))
            .with_filename("sample.pdf")
            .with_concurrency(3)
            .with_timeout_ms(5000);

        let summary = runner_with(config).run().await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 0);
        for trial in &summary.trials {
            assert!(matches!(
                trial.outcome,
                TrialOutcome::TransportError { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_payload_bytes_and_filename_on_the_wire() {
        use wiremock::matchers::body_string_contains;

        let server = MockServer::start().await;
        // Matches only when the multipart body carries the payload bytes and
        // the configured filename; anything else falls through to 404
        Mock::given(method("POST"))
            .and(path("/transform"))
            .and(body_string_contains("0123456789"))
            .and(body_string_contains("sample.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let summary = runner_with(config_for(&server)).run().await.unwrap();
        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn test_success_regardless_of_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let summary = runner_with(config_for(&server)).run().await.unwrap();
        assert_eq!(summary.trials[0].outcome, TrialOutcome::Success);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
            )
            .mount(&server)
            .await;

        let runner = runner_with(config_for(&server));
        assert!(runner.health().await.unwrap());
    }
}
