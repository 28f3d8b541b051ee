//! Read side of the static page runtime.
//!
//! Pages are served from the artifact cache with an edge cache policy that
//! keeps them until `/api/revalidate` replaces them.

use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::error;

use crate::domain::ports::RegenerationError;
use crate::domain::{Error, PagePath};

use super::ApiResult;
use super::cache_control::static_page_header;
use super::state::HttpState;

fn map_regeneration_error(err: RegenerationError) -> Error {
    match err {
        RegenerationError::UnknownPage { path } => {
            Error::not_found(format!("no page is served at {path}"))
        }
        other => {
            error!(error = %other, "static page render failed");
            Error::internal("page could not be rendered")
        }
    }
}

async fn serve(state: &HttpState, req: &HttpRequest) -> ApiResult<HttpResponse> {
    let path = PagePath::new(req.path())
        .ok_or_else(|| Error::not_found("page path is empty"))?;
    let page = state
        .pages
        .serve(&path)
        .await
        .map_err(map_regeneration_error)?
        .ok_or_else(|| Error::not_found(format!("no page is served at {path}")))?;
    Ok(HttpResponse::Ok()
        .insert_header(static_page_header())
        .json(page))
}

/// Article listing page.
#[utoipa::path(
    get,
    path = "/article",
    responses(
        (status = 200, description = "Listing page props", body = crate::inbound::http::schemas::StaticPageSchema),
        (status = 500, description = "Render failed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["pages"]
)]
#[get("/article")]
pub async fn listing_page(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    serve(&state, &req).await
}

/// The listing also answers with a trailing slash, the form revalidation uses.
#[get("/article/")]
pub async fn listing_page_slash(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    serve(&state, &req).await
}

/// Article detail page.
#[utoipa::path(
    get,
    path = "/article/{slug}",
    params(("slug" = String, Path, description = "Article slug ending in `_<id>`")),
    responses(
        (status = 200, description = "Detail page props", body = crate::inbound::http::schemas::StaticPageSchema),
        (status = 404, description = "No article behind the slug", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Render failed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["pages"]
)]
#[get("/article/{slug}")]
pub async fn detail_page(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    serve(&state, &req).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(listing_page)
        .service(listing_page_slash)
        .service(detail_page);
}
