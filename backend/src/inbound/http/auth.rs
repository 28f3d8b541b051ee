//! Development sign-in.
//!
//! Real identity lives with an external provider. These routes let a local
//! instance sign in as an existing user and are only mounted when
//! `AUTH_DEV_LOGIN=1`.

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Caller, Error};

use super::ApiResult;
use super::cache_control::private_no_cache_header;
use super::caller::map_lookup_error;
use super::rpc::SessionView;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::parse_user_id;

pub const DEV_LOGIN_ENV: &str = "AUTH_DEV_LOGIN";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevLoginRequest {
    #[schema(example = "demo-user")]
    pub user_id: String,
}

/// Sign in as an existing user.
#[utoipa::path(
    post,
    path = "/api/auth/dev-login",
    request_body = DevLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = crate::inbound::http::rpc::SessionView),
        (status = 400, description = "Malformed user id", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unknown user", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"]
)]
#[post("/api/auth/dev-login")]
pub async fn dev_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DevLoginRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id("userId", payload.into_inner().user_id)?;
    let user = state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(map_lookup_error)?
        .ok_or_else(|| Error::unauthorized("unknown user"))?;
    session.persist_user(user.id())?;
    info!(user_id = %user.id(), "development sign-in");
    let caller = Caller::authenticated(user);
    let view = caller.identity().map(SessionView::from);
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(view))
}

/// Forget the signed-in user.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"]
)]
#[post("/api/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dev_login).service(logout);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::test_support::user;
    use crate::inbound::http::rpc::{mutation, query};
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};

    #[actix_web::test]
    async fn dev_login_sets_a_session_that_logout_clears() {
        let mut ports = MockPorts::default();
        ports
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(&id.to_string()))));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .wrap(test_session_middleware())
                .configure(configure)
                .service(query)
                .service(mutation),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/dev-login")
                .set_json(json!({"userId": "alice"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .next()
            .map(|cookie| cookie.into_owned())
            .expect("session cookie");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["id"], "alice");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/trpc/auth.getSession")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["result"]["data"]["user"]["id"], "alice");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cleared = res
            .response()
            .cookies()
            .next()
            .map(|cookie| cookie.value().to_owned())
            .expect("removal cookie");
        assert!(cleared.is_empty());
    }

    #[actix_web::test]
    async fn unknown_users_cannot_sign_in() {
        let mut ports = MockPorts::default();
        ports.users.expect_find_by_id().returning(|_| Ok(None));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/dev-login")
                .set_json(json!({"userId": "ghost"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().next().is_none());
    }
}
