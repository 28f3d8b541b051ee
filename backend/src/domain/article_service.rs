//! Article use-cases behind the `article.*` procedures.
//!
//! Reads are public. Mutations require an authenticated caller who owns the
//! article, both as claimed in the request and as stored. Successful
//! mutations queue revalidation of the affected page; a failure to queue is
//! logged and never fails the mutation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ArticleCommand, ArticleQuery, ArticleRepository, ArticleRepositoryError,
    CreateArticleRequest, DeleteArticleRequest, RevalidationScheduler, UpdateArticleRequest,
};
use crate::domain::{
    Article, ArticleChanges, ArticleId, ArticleWithAuthor, Caller, Error, NewArticle,
    RevalidationTarget, slugify,
};

pub const UPDATE_FORBIDDEN_MESSAGE: &str = "You are not allowed to update this article";
pub const DELETE_FORBIDDEN_MESSAGE: &str = "You are not allowed to delete this article";

/// Article query and command service.
#[derive(Clone)]
pub struct ArticleService<R> {
    articles: Arc<R>,
    revalidation: Arc<dyn RevalidationScheduler>,
    clock: Arc<dyn Clock>,
}

impl<R> ArticleService<R> {
    pub fn new(
        articles: Arc<R>,
        revalidation: Arc<dyn RevalidationScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            articles,
            revalidation,
            clock,
        }
    }

    async fn schedule(&self, target: RevalidationTarget) {
        let path = target.path();
        if let Err(error) = self.revalidation.schedule(target).await {
            warn!(%error, %path, "revalidation not scheduled; page may serve stale content");
        }
    }
}

fn map_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article store unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article store error: {message}"))
        }
    }
}

fn article_not_found(id: &ArticleId) -> Error {
    Error::not_found(format!("article {id} not found"))
}

#[async_trait]
impl<R> ArticleQuery for ArticleService<R>
where
    R: ArticleRepository,
{
    async fn fetch_all(&self) -> Result<Vec<ArticleWithAuthor>, Error> {
        self.articles
            .list_with_authors()
            .await
            .map_err(map_repository_error)
    }

    async fn fetch_one(&self, id: &ArticleId) -> Result<Option<ArticleWithAuthor>, Error> {
        self.articles
            .find_with_author(id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> ArticleCommand for ArticleService<R>
where
    R: ArticleRepository,
{
    async fn create(
        &self,
        caller: &Caller,
        request: CreateArticleRequest,
    ) -> Result<Article, Error> {
        let identity = caller.require_authenticated()?;
        let id = ArticleId::generate();
        let title = request.draft.title().as_ref();
        let article = NewArticle {
            slug: slugify(title, Some(id.as_ref())),
            title: title.to_owned(),
            content: request.draft.content().as_ref().to_owned(),
            id,
            author_id: identity.id().clone(),
            created_at: self.clock.utc(),
        };

        let created = self
            .articles
            .insert(&article)
            .await
            .map_err(map_repository_error)?;
        info!(article_id = %created.id, slug = %created.slug, "article created");
        self.schedule(RevalidationTarget::article_listing()).await;
        Ok(created)
    }

    async fn update(
        &self,
        caller: &Caller,
        request: UpdateArticleRequest,
    ) -> Result<Article, Error> {
        let identity = caller.require_authenticated()?;
        identity.require_owner(&request.author_id, UPDATE_FORBIDDEN_MESSAGE)?;

        let existing = self
            .articles
            .find_by_id(&request.id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| article_not_found(&request.id))?;
        identity.require_owner(&existing.author_id, UPDATE_FORBIDDEN_MESSAGE)?;

        let title = request.draft.title().as_ref();
        let changes = ArticleChanges {
            slug: slugify(title, Some(request.id.as_ref())),
            title: title.to_owned(),
            content: request.draft.content().as_ref().to_owned(),
            id: request.id,
            updated_at: self.clock.utc(),
        };
        let updated = self
            .articles
            .update(&changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| article_not_found(&changes.id))?;

        info!(article_id = %updated.id, slug = %updated.slug, "article updated");
        if existing.slug != updated.slug {
            self.schedule(RevalidationTarget::article(existing.slug)).await;
        }
        self.schedule(RevalidationTarget::article(updated.slug.clone()))
            .await;
        Ok(updated)
    }

    async fn delete(
        &self,
        caller: &Caller,
        request: DeleteArticleRequest,
    ) -> Result<Article, Error> {
        let identity = caller.require_authenticated()?;
        identity.require_owner(&request.author_id, DELETE_FORBIDDEN_MESSAGE)?;

        let existing = self
            .articles
            .find_by_id(&request.id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| article_not_found(&request.id))?;
        identity.require_owner(&existing.author_id, DELETE_FORBIDDEN_MESSAGE)?;

        let deleted = self
            .articles
            .delete(&request.id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| article_not_found(&request.id))?;

        info!(article_id = %deleted.id, "article deleted");
        self.schedule(RevalidationTarget::article_listing()).await;
        self.schedule(RevalidationTarget::article(deleted.slug.clone()))
            .await;
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
