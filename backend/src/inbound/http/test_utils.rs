//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    MockArticleCommand, MockArticleQuery, MockPageRegenerator, MockStaticPages,
    MockUserRepository,
};
use crate::domain::{CipherAlgorithm, PathCodec, UserId};

use super::session::SessionContext;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::HttpState;

pub const TEST_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";
pub const TEST_LOGIN_PATH: &str = "/test/login/{user_id}";

/// Session middleware with a fresh key and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

pub fn test_codec() -> Arc<PathCodec> {
    Arc::new(PathCodec::new(CipherAlgorithm::Aes256Cbc, TEST_KEY).expect("valid key"))
}

/// Mocks for every port in [`HttpState`]; tests set expectations before
/// calling [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub articles: MockArticleQuery,
    pub article_commands: MockArticleCommand,
    pub users: MockUserRepository,
    pub pages: MockStaticPages,
    pub regenerator: MockPageRegenerator,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            articles: Arc::new(self.articles),
            article_commands: Arc::new(self.article_commands),
            users: Arc::new(self.users),
            pages: Arc::new(self.pages),
            regenerator: Arc::new(self.regenerator),
            codec: test_codec(),
        })
    }
}

/// Signs the caller in as the user named in the path.
pub async fn test_login(
    session: SessionContext,
    user_id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let user_id = UserId::new(user_id.into_inner()).expect("test user id");
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_test_login(cfg: &mut web::ServiceConfig) {
    cfg.route(TEST_LOGIN_PATH, web::post().to(test_login));
}

/// Log in through [`TEST_LOGIN_PATH`] and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("/test/login/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}
