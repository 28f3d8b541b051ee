//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their wire
//! shape and are registered under the domain type's name.

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error envelope returned by every JSON endpoint except `/api/revalidate`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Describe title more clearly")]
    message: String,
    #[schema(example = "01HZY8B2W6X5Y7Z9ABCD1234")]
    trace_id: Option<String>,
    /// `{field, code}` for validation failures.
    details: Option<serde_json::Value>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Article, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ArticleSchema {
    #[schema(example = "9f0c2e4b7d1a4c3e8b5f6a7d8c9e0f1a")]
    id: String,
    #[schema(example = "Hello wide world")]
    title: String,
    content: String,
    #[schema(example = "hello-wide-world_9f0c2e4b7d1a4c3e8b5f6a7d8c9e0f1a")]
    slug: String,
    author_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::AuthorSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AuthorSummarySchema {
    name: Option<String>,
    image: Option<String>,
}

/// Article fields flattened next to the author summary.
#[derive(ToSchema)]
#[schema(as = crate::domain::ArticleWithAuthor)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ArticleWithAuthorSchema {
    #[schema(inline)]
    article: ArticleSchema,
    author: AuthorSummarySchema,
}

/// Hex-encoded IV, ciphertext and MAC tag of a page path.
#[derive(ToSchema)]
#[schema(as = crate::domain::EncryptedPath)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EncryptedPathSchema {
    #[schema(example = "00112233445566778899aabbccddeeff")]
    iv: String,
    content: String,
    tag: String,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::RevalidationResponse)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RevalidationResponseSchema {
    revalidated: bool,
    #[schema(example = "/article/")]
    path: String,
    #[schema(example = "Invalid HTTP method")]
    message: Option<String>,
    error: Option<String>,
}

/// Rendered page props.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::StaticPage, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct StaticPageSchema {
    #[schema(example = "/article/")]
    path: String,
    /// `{articles: [...]}` for the listing, `{article: {...}}` for a detail page.
    props: serde_json::Value,
    generated_at: chrono::DateTime<chrono::Utc>,
}
