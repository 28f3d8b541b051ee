//! Revalidation targets, page paths and the endpoint's response body.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page segment serving articles.
pub const ARTICLE_PAGE: &str = "article";

/// Rejection message for any method other than `POST`.
pub const INVALID_METHOD_MESSAGE: &str = "Invalid HTTP method";
/// Rejection message for a payload that decrypts to the empty path.
pub const PATH_REQUIRED_MESSAGE: &str = "Path required";
/// Message returned when regenerating the page failed.
pub const INVALIDATION_ERROR_MESSAGE: &str = "Invalidation error";
/// Rejection message for a body that is not a valid encrypted path.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload";

/// A page (and optional parameter) whose static artifact should be rebuilt.
///
/// ```
/// use folio::domain::RevalidationTarget;
///
/// assert_eq!(RevalidationTarget::new("article", None).path(), "/article/");
/// assert_eq!(
///     RevalidationTarget::new("article", Some("hello-world_ab12".into())).path(),
///     "/article/hello-world_ab12",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationTarget {
    page: String,
    param: Option<String>,
}

impl RevalidationTarget {
    pub fn new(page: impl Into<String>, param: Option<String>) -> Self {
        Self {
            page: page.into(),
            param,
        }
    }

    /// The article listing page.
    #[must_use]
    pub fn article_listing() -> Self {
        Self::new(ARTICLE_PAGE, None)
    }

    /// The detail page for an article slug.
    pub fn article(slug: impl Into<String>) -> Self {
        Self::new(ARTICLE_PAGE, Some(slug.into()))
    }

    /// Page segment, e.g. `article`.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Path in the form `/{page}/{param}`; the param may be empty.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.page, self.param.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for RevalidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decrypted, non-empty page path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePath(String);

impl PagePath {
    /// Returns `None` for the empty path.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON body returned by the revalidation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevalidationResponse {
    /// Whether the page was regenerated.
    pub revalidated: bool,
    /// The decrypted path, or empty when it could not be recovered.
    pub path: String,
    /// Why the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Cause of a failed regeneration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevalidationResponse {
    pub fn success(path: impl Into<String>) -> Self {
        Self {
            revalidated: true,
            path: path.into(),
            message: None,
            error: None,
        }
    }

    /// The request was refused before regeneration was attempted.
    pub fn rejected(path: impl Into<String>, message: &str) -> Self {
        Self {
            revalidated: false,
            path: path.into(),
            message: Some(message.to_owned()),
            error: None,
        }
    }

    /// Regeneration ran and failed.
    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            revalidated: false,
            path: path.into(),
            message: Some(INVALIDATION_ERROR_MESSAGE.to_owned()),
            error: Some(error.into()),
        }
    }

    /// Only regeneration failures are worth retrying; rejections will repeat.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !self.revalidated && self.message.as_deref() == Some(INVALIDATION_ERROR_MESSAGE)
    }
}
