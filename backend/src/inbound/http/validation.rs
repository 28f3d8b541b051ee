//! Mapping of input validation failures onto `invalid_request` errors.
//!
//! Every failure carries `details: {field, code}` so clients can attach the
//! message to the offending form field.

use serde_json::json;

use crate::domain::{
    ArticleDraft, ArticleId, ArticleValidationError, Error, UserId, UserValidationError,
};

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn article_error(err: ArticleValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

fn user_id_error(field: &str, err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyId => "empty_id",
        UserValidationError::IdTooLong { .. } => "id_too_long",
        UserValidationError::IdContainsWhitespace => "id_contains_whitespace",
        UserValidationError::UnknownRole(_) => "unknown_role",
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn parse_article_id(raw: String) -> Result<ArticleId, Error> {
    ArticleId::new(raw).map_err(article_error)
}

pub(crate) fn parse_user_id(field: &str, raw: String) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| user_id_error(field, &err))
}

pub(crate) fn parse_draft(title: String, content: String) -> Result<ArticleDraft, Error> {
    ArticleDraft::try_from_parts(title, content).map_err(article_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("One", "x".repeat(200), "title", "title_too_vague", "Describe title more clearly")]
    #[case(&"word ".repeat(40), "x".repeat(200), "title", "title_too_long", "Title is too long")]
    #[case("Two words", "short".to_owned(), "content", "content_too_short", "Description is not long enough")]
    fn draft_failures_name_the_field(
        #[case] title: &str,
        #[case] content: String,
        #[case] field: &str,
        #[case] code: &str,
        #[case] message: &str,
    ) {
        let error = parse_draft(title.to_owned(), content).expect_err("invalid draft");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), message);
        assert_eq!(error.details(), Some(&json!({"field": field, "code": code})));
    }

    #[rstest]
    fn author_id_failures_use_the_request_field_name() {
        let error = parse_user_id("authorId", String::new()).expect_err("empty id");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "authorId", "code": "empty_id"}))
        );
    }

    #[rstest]
    fn blank_article_ids_are_rejected() {
        let error = parse_article_id(" ".to_owned()).expect_err("whitespace id");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "id", "code": "id_contains_whitespace"}))
        );
    }
}
