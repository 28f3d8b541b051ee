//! Reqwest-backed revalidation client.
//!
//! Encrypts the target path, POSTs it to `/api/revalidate` and then fetches
//! the page so the fresh artifact is already cached for the next reader.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{RevalidationClient, RevalidationClientError};
use crate::domain::{PathCodec, RevalidationResponse, RevalidationTarget};

const REVALIDATE_ENDPOINT: &str = "/api/revalidate";

/// HTTP implementation of the [`RevalidationClient`] port.
pub struct HttpRevalidationClient {
    client: Client,
    base_url: Url,
    codec: Arc<PathCodec>,
}

impl HttpRevalidationClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        codec: Arc<PathCodec>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            codec,
        })
    }
}

#[async_trait]
impl RevalidationClient for HttpRevalidationClient {
    async fn revalidate(
        &self,
        target: &RevalidationTarget,
    ) -> Result<RevalidationResponse, RevalidationClientError> {
        let path = target.path();
        let payload = self
            .codec
            .encrypt(&path)
            .map_err(|err| RevalidationClientError::encode(err.to_string()))?;

        let response = self
            .client
            .post(join(&self.base_url, REVALIDATE_ENDPOINT)?)
            .json(&payload)
            .send()
            .await
            .map_err(|err| RevalidationClientError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| RevalidationClientError::transport(err.to_string()))?;
        let parsed = decode_response(status, &body)?;

        let warmup = self
            .client
            .get(join(&self.base_url, &path)?)
            .send()
            .await
            .map_err(|err| RevalidationClientError::warmup(err.to_string()))?;
        debug!(%path, status = warmup.status().as_u16(), "page warmed");

        Ok(parsed)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, RevalidationClientError> {
    base.join(path)
        .map_err(|err| RevalidationClientError::encode(format!("invalid URL for {path}: {err}")))
}

/// Parse the endpoint body whatever the status; only the shape matters.
fn decode_response(
    status: StatusCode,
    body: &[u8],
) -> Result<RevalidationResponse, RevalidationClientError> {
    serde_json::from_slice(body).map_err(|err| {
        RevalidationClientError::decode(format!("status {}: {err}", status.as_u16()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::success(StatusCode::OK, r#"{"revalidated":true,"path":"/article/"}"#, true)]
    #[case::rejected(
        StatusCode::BAD_REQUEST,
        r#"{"revalidated":false,"path":"","message":"Path required"}"#,
        false
    )]
    #[case::failed(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"revalidated":false,"path":"/article/x_1","message":"Invalidation error","error":"boom"}"#,
        false
    )]
    fn bodies_are_decoded_regardless_of_status(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] revalidated: bool,
    ) {
        let response = decode_response(status, body.as_bytes()).expect("decodes");
        assert_eq!(response.revalidated, revalidated);
    }

    #[rstest]
    fn non_json_bodies_are_decode_errors() {
        let error = decode_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
            .expect_err("not json");
        assert!(matches!(error, RevalidationClientError::Decode { .. }));
        assert!(!error.is_retryable());
    }

    #[rstest]
    #[case("http://localhost:8080", "/api/revalidate", "http://localhost:8080/api/revalidate")]
    #[case("http://pages:3000/base/", "/article/", "http://pages:3000/article/")]
    fn paths_are_joined_onto_the_origin(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let base = Url::parse(base).expect("base url");
        assert_eq!(join(&base, path).expect("joined").as_str(), expected);
    }
}
