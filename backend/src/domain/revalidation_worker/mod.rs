//! Delivery of queued revalidation jobs with jittered exponential backoff.
//!
//! The worker calls the [`RevalidationClient`] port until the endpoint reports
//! `revalidated: true`, a permanent failure occurs or attempts run out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{RevalidationClient, RevalidationClientError};
use crate::domain::{Error, RevalidationResponse, RevalidationTarget};

mod runtime;

pub use runtime::{AttemptJitter, RevalidationWorkerRuntime, TokioSleeper};

/// Retry policy for revalidation delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationWorkerConfig {
    /// Attempts per job, including the first call.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay before jitter.
    pub max_backoff: Duration,
}

impl Default for RevalidationWorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Summary of a delivered job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationJobOutcome {
    pub attempts: u32,
    pub response: RevalidationResponse,
}

/// Async sleep used between attempts.
#[async_trait]
pub trait RetrySleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Spreads retry delays so bursts of jobs do not retry in lockstep.
pub trait BackoffJitter: Send + Sync {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

enum AttemptFailure {
    Retryable(String),
    Permanent(Error),
}

/// Revalidation job runner.
pub struct RevalidationWorker {
    client: Arc<dyn RevalidationClient>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn RetrySleeper>,
    jitter: Arc<dyn BackoffJitter>,
    config: RevalidationWorkerConfig,
}

impl RevalidationWorker {
    /// Build a worker that sleeps on Tokio timers.
    pub fn new(
        client: Arc<dyn RevalidationClient>,
        clock: Arc<dyn Clock>,
        config: RevalidationWorkerConfig,
    ) -> Self {
        Self::with_runtime(client, clock, RevalidationWorkerRuntime::default(), config)
    }

    pub fn with_runtime(
        client: Arc<dyn RevalidationClient>,
        clock: Arc<dyn Clock>,
        runtime: RevalidationWorkerRuntime,
        config: RevalidationWorkerConfig,
    ) -> Self {
        Self {
            client,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            config,
        }
    }

    /// Deliver one job, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] with `service_unavailable` once retries are exhausted
    /// and `internal_error` for failures that retrying cannot fix.
    pub async fn process_job(
        &self,
        target: &RevalidationTarget,
    ) -> Result<RevalidationJobOutcome, Error> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.run_single_attempt(target).await {
                Ok(response) => {
                    info!(path = %response.path, attempts = attempt, "page revalidated");
                    return Ok(RevalidationJobOutcome {
                        attempts: attempt,
                        response,
                    });
                }
                Err(AttemptFailure::Retryable(reason)) if attempt < max_attempts => {
                    let delay = self.jitter.jittered_delay(
                        self.retry_base_delay(attempt),
                        attempt,
                        self.clock.utc(),
                    );
                    debug!(path = %target, attempt, ?delay, %reason, "retrying revalidation");
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(AttemptFailure::Retryable(reason)) => {
                    warn!(path = %target, attempts = attempt, %reason, "revalidation retries exhausted");
                    return Err(Error::service_unavailable(format!(
                        "revalidation of {target} failed after {attempt} attempts: {reason}"
                    )));
                }
                Err(AttemptFailure::Permanent(error)) => {
                    warn!(path = %target, attempts = attempt, %error, "revalidation rejected");
                    return Err(error);
                }
            }
        }
    }

    async fn run_single_attempt(
        &self,
        target: &RevalidationTarget,
    ) -> Result<RevalidationResponse, AttemptFailure> {
        match self.client.revalidate(target).await {
            Ok(response) if response.revalidated => Ok(response),
            Ok(response) if response.is_retryable() => Err(AttemptFailure::Retryable(
                response.error.unwrap_or_else(|| "regeneration failed".to_owned()),
            )),
            Ok(response) => Err(AttemptFailure::Permanent(Error::internal(format!(
                "revalidation of {target} rejected: {}",
                response.message.as_deref().unwrap_or("no reason given")
            )))),
            Err(error) if error.is_retryable() => Err(AttemptFailure::Retryable(error.to_string())),
            Err(error) => Err(AttemptFailure::Permanent(map_client_error(&error))),
        }
    }

    fn retry_base_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.config
            .initial_backoff
            .saturating_mul(factor)
            .min(self.config.max_backoff)
    }
}

fn map_client_error(error: &RevalidationClientError) -> Error {
    Error::internal(error.to_string())
}
