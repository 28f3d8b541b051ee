//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in sync with `backend/migrations`; `diesel print-schema` regenerates
//! these from a live database.

diesel::table! {
    /// Users mirrored from the identity provider.
    users (id) {
        id -> Varchar,
        name -> Nullable<Varchar>,
        image -> Nullable<Text>,
        /// `ADMIN` or `USER`.
        role -> Varchar,
    }
}

diesel::table! {
    articles (id) {
        id -> Varchar,
        title -> Varchar,
        content -> Text,
        /// `slugify(title, id)`; unique because it ends with the id.
        slug -> Varchar,
        author_id -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> users (author_id));
diesel::allow_tables_to_appear_in_same_query!(articles, users);
