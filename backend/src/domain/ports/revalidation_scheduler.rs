//! Driven port for handing revalidation work to a background worker.

use async_trait::async_trait;

use crate::domain::RevalidationTarget;

use super::define_port_error;

define_port_error! {
    /// Errors raised when a revalidation job cannot be queued.
    pub enum JobDispatchError {
        /// The worker has stopped and no longer accepts jobs.
        Unavailable { message: String } => "revalidation worker unavailable: {message}",
        /// The queue refused the job, typically because it is full.
        Rejected { message: String } => "revalidation job rejected: {message}",
    }
}

/// Queue a page for asynchronous revalidation.
///
/// Scheduling must not block the calling request on the revalidation itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevalidationScheduler: Send + Sync {
    async fn schedule(&self, target: RevalidationTarget) -> Result<(), JobDispatchError>;
}
