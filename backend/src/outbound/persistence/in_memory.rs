//! Process-local repositories used when no database is configured.
//!
//! Reads mirror the Diesel adapters: articles join onto their author and
//! articles whose author is missing are skipped, as an inner join would.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Article, ArticleChanges, ArticleId, ArticleWithAuthor, AuthorSummary, NewArticle, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

/// Users keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `users`, replacing entries with the same id.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect();
        Self {
            users: RwLock::new(map),
        }
    }

    /// Insert or replace a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Query`] if the lock is poisoned.
    pub fn upsert(&self, user: User) -> Result<(), UserRepositoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| UserRepositoryError::query(POISONED))?;
        users.insert(user.id().clone(), user);
        Ok(())
    }

    fn author(&self, id: &UserId) -> Result<Option<AuthorSummary>, ArticleRepositoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| ArticleRepositoryError::query(POISONED))?;
        Ok(users.get(id).map(|user| AuthorSummary {
            name: user.name().map(str::to_owned),
            image: user.image().map(str::to_owned),
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| UserRepositoryError::query(POISONED))?;
        Ok(users.get(id).cloned())
    }
}

/// Articles keyed by id, joined against an [`InMemoryUserRepository`].
#[derive(Debug)]
pub struct InMemoryArticleRepository {
    users: Arc<InMemoryUserRepository>,
    articles: RwLock<HashMap<ArticleId, Article>>,
}

impl InMemoryArticleRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            articles: RwLock::new(HashMap::new()),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ArticleId, Article>>, ArticleRepositoryError>
    {
        self.articles
            .read()
            .map_err(|_| ArticleRepositoryError::query(POISONED))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ArticleId, Article>>, ArticleRepositoryError>
    {
        self.articles
            .write()
            .map_err(|_| ArticleRepositoryError::query(POISONED))
    }

    fn with_author(
        &self,
        article: Article,
    ) -> Result<Option<ArticleWithAuthor>, ArticleRepositoryError> {
        Ok(self
            .users
            .author(&article.author_id)?
            .map(|author| ArticleWithAuthor { article, author }))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list_with_authors(&self) -> Result<Vec<ArticleWithAuthor>, ArticleRepositoryError> {
        let mut articles: Vec<Article> = self.read()?.values().cloned().collect();
        articles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_ref().cmp(b.id.as_ref()))
        });
        let mut views = Vec::with_capacity(articles.len());
        for article in articles {
            if let Some(view) = self.with_author(article)? {
                views.push(view);
            }
        }
        Ok(views)
    }

    async fn find_with_author(
        &self,
        id: &ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, ArticleRepositoryError> {
        let article = self.read()?.get(id).cloned();
        match article {
            Some(article) => self.with_author(article),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        if self.users.author(&article.author_id)?.is_none() {
            return Err(ArticleRepositoryError::query(format!(
                "author {} does not exist",
                article.author_id
            )));
        }
        let mut articles = self.write()?;
        if articles.contains_key(&article.id) {
            return Err(ArticleRepositoryError::query(format!(
                "article {} already exists",
                article.id
            )));
        }
        if articles.values().any(|existing| existing.slug == article.slug) {
            return Err(ArticleRepositoryError::query(format!(
                "slug {} already exists",
                article.slug
            )));
        }
        let stored = Article {
            id: article.id.clone(),
            title: article.title.clone(),
            content: article.content.clone(),
            slug: article.slug.clone(),
            author_id: article.author_id.clone(),
            created_at: article.created_at,
            updated_at: article.created_at,
        };
        articles.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut articles = self.write()?;
        let Some(article) = articles.get_mut(&changes.id) else {
            return Ok(None);
        };
        article.title.clone_from(&changes.title);
        article.content.clone_from(&changes.content);
        article.slug.clone_from(&changes.slug);
        article.updated_at = changes.updated_at;
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self.write()?.remove(id))
    }
}
