//! PostgreSQL-backed `ArticleRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{
    Article, ArticleChanges, ArticleId, ArticleWithAuthor, AuthorSummary, NewArticle, UserId,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ArticleRow, ArticleUpdate, AuthorRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, users};

/// Diesel implementation of the `ArticleRepository` port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ArticleRepositoryError {
    map_pool_error(error, ArticleRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    map_diesel_error(
        error,
        ArticleRepositoryError::query,
        ArticleRepositoryError::connection,
    )
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticleRepositoryError> {
    let id = ArticleId::new(row.id)
        .map_err(|err| ArticleRepositoryError::query(format!("stored article id: {err}")))?;
    let author_id = UserId::new(row.author_id)
        .map_err(|err| ArticleRepositoryError::query(format!("stored author id: {err}")))?;
    Ok(Article {
        id,
        title: row.title,
        content: row.content,
        slug: row.slug,
        author_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_view(
    (article, author): (ArticleRow, AuthorRow),
) -> Result<ArticleWithAuthor, ArticleRepositoryError> {
    Ok(ArticleWithAuthor {
        article: row_to_article(article)?,
        author: AuthorSummary {
            name: author.name,
            image: author.image,
        },
    })
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list_with_authors(&self) -> Result<Vec<ArticleWithAuthor>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(ArticleRow, AuthorRow)> = articles::table
            .inner_join(users::table)
            .select((ArticleRow::as_select(), AuthorRow::as_select()))
            .order((articles::created_at.desc(), articles::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(rows_to_view).collect()
    }

    async fn find_with_author(
        &self,
        id: &ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(ArticleRow, AuthorRow)> = articles::table
            .inner_join(users::table)
            .filter(articles::id.eq(id.as_ref()))
            .select((ArticleRow::as_select(), AuthorRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(rows_to_view).transpose()
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ArticleRow> = articles::table
            .find(id.as_ref())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewArticleRow {
            id: article.id.as_ref(),
            title: &article.title,
            content: &article.content,
            slug: &article.slug,
            author_id: article.author_id.as_ref(),
            created_at: article.created_at,
            updated_at: article.created_at,
        };
        let stored: ArticleRow = diesel::insert_into(articles::table)
            .values(&row)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_article(stored)
    }

    async fn update(
        &self,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = ArticleUpdate {
            title: &changes.title,
            content: &changes.content,
            slug: &changes.slug,
            updated_at: changes.updated_at,
        };
        let stored: Option<ArticleRow> = diesel::update(articles::table.find(changes.id.as_ref()))
            .set(&update)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        stored.map(row_to_article).transpose()
    }

    async fn delete(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed: Option<ArticleRow> = diesel::delete(articles::table.find(id.as_ref()))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        removed.map(row_to_article).transpose()
    }
}
