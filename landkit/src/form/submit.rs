//! The submission seam: where collected form data leaves the page.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::form::FormData;

/// Why a submission attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("Submission timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Failure worth retrying, e.g. a dropped connection.
    #[error("Submission failed: {0}")]
    Transient(String),

    /// Final refusal, e.g. the receiving end rejected the payload.
    #[error("Submission rejected: {0}")]
    Rejected(String),
}

impl SubmitError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transient(_))
    }
}

/// Delivers form data somewhere.
pub trait Submitter {
    /// Submit one payload. Resolves once the receiving end has answered.
    fn submit(&self, data: &FormData) -> impl Future<Output = Result<(), SubmitError>>;
}

/// Fixed-latency submitter that always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter {
    pub latency: Duration,
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }
}

impl Submitter for SimulatedSubmitter {
    async fn submit(&self, data: &FormData) -> Result<(), SubmitError> {
        tokio::time::sleep(self.latency).await;
        debug!(fields = data.len(), "Simulated submission accepted");
        Ok(())
    }
}

/// Submitter that fails every attempt with the same error.
#[derive(Debug, Clone)]
pub struct FailingSubmitter {
    pub latency: Duration,
    pub error: SubmitError,
}

impl FailingSubmitter {
    #[must_use]
    pub const fn new(latency: Duration, error: SubmitError) -> Self {
        Self { latency, error }
    }
}

impl Submitter for FailingSubmitter {
    async fn submit(&self, _data: &FormData) -> Result<(), SubmitError> {
        tokio::time::sleep(self.latency).await;
        Err(self.error.clone())
    }
}

/// Timeout and retry policy applied around every [`Submitter`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct SubmissionPolicy {
    /// Per-attempt limit; `None` waits forever.
    pub timeout_ms: Option<u64>,
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff_ms: u64,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: u32,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: Some(10_000),
            max_attempts: 3,
            initial_backoff_ms: 500,
            backoff_factor: 2,
        }
    }
}

impl SubmissionPolicy {
    /// A single attempt with no timeout and no retries.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// Submit `data`, retrying retryable failures with exponential backoff.
///
/// Returns the number of attempts used on success.
///
/// # Errors
///
/// Returns the last error once it is not retryable or the attempts run out.
pub async fn submit_with_policy<S: Submitter>(
    submitter: &S,
    data: &FormData,
    policy: &SubmissionPolicy,
) -> Result<u32, SubmitError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.initial_backoff();
    let mut attempt = 1;
    loop {
        let result = match policy.timeout() {
            Some(limit) => tokio::time::timeout(limit, submitter.submit(data))
                .await
                .unwrap_or(Err(SubmitError::Timeout(limit))),
            None => submitter.submit(data).await,
        };
        match result {
            Ok(()) => return Ok(attempt),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Submission attempt failed; retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(policy.backoff_factor);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
