//! `/api/revalidate`: rebuild a static page named by an encrypted path.
//!
//! Every method reaches the handler so a wrong method gets the documented
//! JSON answer. The body is decoded before the method is checked, so the
//! response can echo the decrypted path. Bodies that are not valid JSON, or
//! that fail authentication or decryption, are rejected as invalid payloads.

use actix_web::http::{Method, StatusCode};
use actix_web::web::{self, Bytes};
use actix_web::{HttpRequest, HttpResponse};
use tracing::{info, warn};

use crate::domain::ports::Regeneration;
use crate::domain::{
    EncryptedPath, INVALID_METHOD_MESSAGE, INVALID_PAYLOAD_MESSAGE, PATH_REQUIRED_MESSAGE,
    PagePath, RevalidationResponse,
};

use super::state::HttpState;

pub const REVALIDATE_PATH: &str = "/api/revalidate";

fn respond(status: StatusCode, body: RevalidationResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

fn decode(state: &HttpState, body: &[u8]) -> Option<String> {
    let payload: EncryptedPath = serde_json::from_slice(body)
        .inspect_err(|error| warn!(%error, "revalidation body is not an encrypted path"))
        .ok()?;
    state
        .codec
        .decrypt(&payload)
        .inspect_err(|error| warn!(%error, "revalidation payload rejected"))
        .ok()
}

/// Decrypt the path, validate the request and regenerate the page.
#[utoipa::path(
    post,
    path = "/api/revalidate",
    tags = ["revalidation"],
    request_body(content = crate::inbound::http::schemas::EncryptedPathSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "Page regenerated", body = crate::inbound::http::schemas::RevalidationResponseSchema),
        (status = 400, description = "Invalid payload, method or path", body = crate::inbound::http::schemas::RevalidationResponseSchema),
        (status = 500, description = "Regeneration failed", body = crate::inbound::http::schemas::RevalidationResponseSchema)
    )
)]
pub async fn revalidate(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: Bytes,
) -> HttpResponse {
    let Some(path) = decode(&state, &body) else {
        return respond(
            StatusCode::BAD_REQUEST,
            RevalidationResponse::rejected("", INVALID_PAYLOAD_MESSAGE),
        );
    };

    if *req.method() != Method::POST {
        warn!(method = %req.method(), %path, "revalidation rejected: method");
        return respond(
            StatusCode::BAD_REQUEST,
            RevalidationResponse::rejected(path, INVALID_METHOD_MESSAGE),
        );
    }

    let Some(page) = PagePath::new(path) else {
        warn!("revalidation rejected: empty path");
        return respond(
            StatusCode::BAD_REQUEST,
            RevalidationResponse::rejected("", PATH_REQUIRED_MESSAGE),
        );
    };

    match state.regenerator.regenerate(&page).await {
        Ok(outcome) => {
            let evicted = matches!(outcome, Regeneration::Removed);
            info!(path = %page, evicted, "revalidation succeeded");
            respond(StatusCode::OK, RevalidationResponse::success(page.as_str()))
        }
        Err(error) => {
            warn!(path = %page, %error, "revalidation failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                RevalidationResponse::failed(page.as_str(), error.to_string()),
            )
        }
    }
}

/// Register the endpoint for every method.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(REVALIDATE_PATH).route(web::route().to(revalidate)));
}
