//! Resolve the request's [`Caller`] from the session cookie.
//!
//! A session naming a user that no longer exists yields an anonymous caller;
//! the identity layer owns users, so a stale cookie is not an error.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::UserRepositoryError;
use crate::domain::{Caller, Error};

use super::session::SessionContext;
use super::state::HttpState;

/// Extractor wrapping the resolved caller.
pub struct CallerContext(pub Caller);

impl CallerContext {
    pub fn into_inner(self) -> Caller {
        self.0
    }
}

pub(crate) fn map_lookup_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

impl FromRequest for CallerContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await?;
            let state = state
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let Some(user_id) = session.user_id()? else {
                return Ok(Self(Caller::Anonymous));
            };
            let user = state
                .users
                .find_by_id(&user_id)
                .await
                .map_err(map_lookup_error)?;
            Ok(Self(match user {
                Some(user) => Caller::authenticated(user),
                None => {
                    warn!(%user_id, "session refers to an unknown user");
                    Caller::Anonymous
                }
            }))
        })
    }
}
