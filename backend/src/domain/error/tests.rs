//! Construction and serialisation coverage for [`Error`].

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
        .parse()
        .expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let error = Error::invalid_request("Title is too long").with_trace_id("abc");
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "Title is too long",
            "traceId": "abc",
        })
    );
}

#[rstest]
fn deserialises_with_details() {
    let value = json!({
        "code": "forbidden",
        "message": "You are not allowed to delete this article",
        "details": { "articleId": "a1" },
    });
    let error: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.details(), Some(&json!({ "articleId": "a1" })));
}

#[rstest]
fn rejects_unknown_fields() {
    let value = json!({ "code": "not_found", "message": "x", "extra": 1 });
    assert!(serde_json::from_value::<Error>(value).is_err());
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::forbidden("nope").to_string(), "nope");
}
