//! Driven port for article persistence.

use async_trait::async_trait;

use crate::domain::{Article, ArticleChanges, ArticleId, ArticleWithAuthor, NewArticle};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// A connection could not be checked out.
        Connection { message: String } => "article repository connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "article repository query failed: {message}",
    }
}

/// Storage for articles and the author details shown beside them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Every article with its author, newest first.
    async fn list_with_authors(&self) -> Result<Vec<ArticleWithAuthor>, ArticleRepositoryError>;

    /// One article with its author.
    async fn find_with_author(
        &self,
        id: &ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, ArticleRepositoryError>;

    /// One article without joining the author.
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Insert a new article and return the stored row.
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError>;

    /// Apply `changes`, returning `None` when the article no longer exists.
    async fn update(
        &self,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Delete an article, returning the removed row when it existed.
    async fn delete(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError>;
}
