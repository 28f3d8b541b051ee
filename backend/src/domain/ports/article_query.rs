//! Driving port for the public article reads.

use async_trait::async_trait;

use crate::domain::{ArticleId, ArticleWithAuthor, Error};

/// Read use-cases exposed as `article.fetchAll` and `article.fetchOne`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// All articles with author summaries.
    async fn fetch_all(&self) -> Result<Vec<ArticleWithAuthor>, Error>;

    /// A single article, or `None` when the id is unknown.
    async fn fetch_one(&self, id: &ArticleId) -> Result<Option<ArticleWithAuthor>, Error>;
}
