//! Driving port for authenticated article mutations.
//!
//! Requests carry already validated inputs; the implementation is responsible
//! for the caller guards, persistence and scheduling page revalidation.

use async_trait::async_trait;

use crate::domain::{Article, ArticleDraft, ArticleId, Caller, Error, UserId};

/// Input for `article.create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArticleRequest {
    pub draft: ArticleDraft,
}

/// Input for `article.update`; `author_id` is the author the client believes
/// owns the article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArticleRequest {
    pub id: ArticleId,
    pub author_id: UserId,
    pub draft: ArticleDraft,
}

/// Input for `article.delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteArticleRequest {
    pub id: ArticleId,
    pub author_id: UserId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    async fn create(
        &self,
        caller: &Caller,
        request: CreateArticleRequest,
    ) -> Result<Article, Error>;

    async fn update(
        &self,
        caller: &Caller,
        request: UpdateArticleRequest,
    ) -> Result<Article, Error>;

    async fn delete(
        &self,
        caller: &Caller,
        request: DeleteArticleRequest,
    ) -> Result<Article, Error>;
}
