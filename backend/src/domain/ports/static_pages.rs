//! Driven ports for the static page runtime.
//!
//! Pages are JSON props artifacts cached per page, served only under their
//! current path. `PageRegenerator` rebuilds
//! an artifact on demand (the revalidation endpoint) and `StaticPages` serves
//! cached artifacts, rendering on a miss.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::PagePath;

use super::define_port_error;

define_port_error! {
    /// Failures while rendering or caching a page.
    pub enum RegenerationError {
        /// No page is served under this path.
        UnknownPage { path: String } => "no static page is served at {path}",
        /// Loading the page data failed.
        Source { message: String } => "page data could not be loaded: {message}",
        /// The page cache is unusable.
        Cache { message: String } => "page cache failure: {message}",
    }
}

/// Rendered page artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    pub path: String,
    pub props: Value,
    pub generated_at: DateTime<Utc>,
}

/// Result of regenerating a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Regeneration {
    /// A fresh artifact replaced the cached one.
    Rendered(StaticPage),
    /// Nothing is served under the path any more; a stale artifact was evicted.
    Removed,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRegenerator: Send + Sync {
    /// Rebuild the artifact for `path` and replace any cached copy.
    async fn regenerate(&self, path: &PagePath) -> Result<Regeneration, RegenerationError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaticPages: Send + Sync {
    /// Serve the cached artifact for `path`, rendering it first on a miss.
    ///
    /// Returns `None` when the page has no content.
    async fn serve(&self, path: &PagePath) -> Result<Option<StaticPage>, RegenerationError>;
}
