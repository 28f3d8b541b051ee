//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types and reject rows that violate domain invariants.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{articles, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: String,
}

/// Author columns joined onto article reads.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub slug: &'a str,
    pub author_id: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
pub(crate) struct ArticleUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub slug: &'a str,
    pub updated_at: DateTime<Utc>,
}
