//! OpenAPI document for the HTTP surface.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::DevLoginRequest;
use crate::inbound::http::rpc::{
    CreateArticleInput, DeleteArticleInput, FetchOneInput, SessionUser, SessionView,
    UpdateArticleInput,
};
use crate::inbound::http::schemas::{
    ArticleSchema, ArticleWithAuthorSchema, AuthorSummarySchema, EncryptedPathSchema,
    ErrorCodeSchema, ErrorSchema, RevalidationResponseSchema, StaticPageSchema,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Signed session cookie naming the current user.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Folio API",
        description = "Article procedures, static pages and on-demand revalidation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::rpc::query,
        crate::inbound::http::rpc::mutation,
        crate::inbound::http::revalidate::revalidate,
        crate::inbound::http::pages::listing_page,
        crate::inbound::http::pages::detail_page,
        crate::inbound::http::auth::dev_login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ArticleSchema,
        AuthorSummarySchema,
        ArticleWithAuthorSchema,
        EncryptedPathSchema,
        RevalidationResponseSchema,
        StaticPageSchema,
        FetchOneInput,
        CreateArticleInput,
        UpdateArticleInput,
        DeleteArticleInput,
        SessionView,
        SessionUser,
        DevLoginRequest,
    )),
    tags(
        (name = "rpc", description = "Article and auth procedures"),
        (name = "revalidation", description = "On-demand static page rebuilds"),
        (name = "pages", description = "Cached static pages"),
        (name = "auth", description = "Development sign-in"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn field_names(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/trpc/{procedure}",
            "/api/revalidate",
            "/article",
            "/article/{slug}",
            "/api/auth/dev-login",
            "/api/auth/logout",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[rstest]
    #[case("crate.domain.Error", &["code", "message", "traceId", "details"])]
    #[case("crate.domain.EncryptedPath", &["iv", "content", "tag"])]
    #[case("UpdateArticleInput", &["id", "title", "content", "authorId"])]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] fields: &[&str]) {
        let names = field_names(schema);
        for field in fields {
            assert!(names.iter().any(|name| name == field), "{schema} lacks {field}");
        }
    }

    #[rstest]
    fn mutations_declare_the_session_cookie() {
        let json = ApiDoc::openapi().to_json().expect("serialise document");
        assert!(json.contains("SessionCookie"));
    }
}
