//! Driven port that asks the page host to rebuild a static page.

use async_trait::async_trait;

use crate::domain::{RevalidationResponse, RevalidationTarget};

use super::define_port_error;

define_port_error! {
    /// Failures talking to the revalidation endpoint.
    pub enum RevalidationClientError {
        /// The path could not be encrypted.
        Encode { message: String } => "revalidation payload could not be built: {message}",
        /// The request did not complete (connect, timeout, I/O).
        Transport { message: String } => "revalidation request failed: {message}",
        /// The endpoint answered with a body that is not a revalidation response.
        Decode { message: String } => "revalidation response was malformed: {message}",
        /// Revalidation succeeded but fetching the fresh page failed.
        Warmup { message: String } => "page warm-up failed: {message}",
    }
}

impl RevalidationClientError {
    /// Transport and warm-up failures are transient; the others will repeat.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Warmup { .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevalidationClient: Send + Sync {
    /// Send the encrypted path for `target`, then fetch the page to warm it.
    ///
    /// Returns the endpoint's parsed body whatever its status code.
    async fn revalidate(
        &self,
        target: &RevalidationTarget,
    ) -> Result<RevalidationResponse, RevalidationClientError>;
}
