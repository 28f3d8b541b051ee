//! Article aggregate and its validated input primitives.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum title length in UTF-16 code units, as browser form limits count.
pub const TITLE_MAX: usize = 160;
/// Minimum content length in UTF-16 code units.
pub const CONTENT_MIN: usize = 200;

/// Validation failures for article inputs.
///
/// The display strings are the messages shown next to form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptyId,
    IdContainsWhitespace,
    TitleTooLong,
    TitleTooVague,
    ContentTooShort,
}

impl ArticleValidationError {
    /// Name of the input field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::IdContainsWhitespace => "id",
            Self::TitleTooLong | Self::TitleTooVague => "title",
            Self::ContentTooShort => "content",
        }
    }

    /// Stable machine-readable reason.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::IdContainsWhitespace => "id_contains_whitespace",
            Self::TitleTooLong => "title_too_long",
            Self::TitleTooVague => "title_too_vague",
            Self::ContentTooShort => "content_too_short",
        }
    }
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => f.write_str("article id must not be empty"),
            Self::IdContainsWhitespace => f.write_str("article id must not contain whitespace"),
            Self::TitleTooLong => f.write_str("Title is too long"),
            Self::TitleTooVague => f.write_str("Describe title more clearly"),
            Self::ContentTooShort => f.write_str("Description is not long enough"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Collision-resistant article identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    /// Generate a fresh identifier (32 lowercase hex characters).
    ///
    /// The simple UUID form contains no `_`, so it survives a slug round trip.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn new(raw: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ArticleValidationError::EmptyId);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(ArticleValidationError::IdContainsWhitespace);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ArticleId {
    type Error = ArticleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArticleId> for String {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

/// Title of at most [`TITLE_MAX`] characters containing more than one word.
fn utf16_len(raw: &str) -> usize {
    raw.encode_utf16().count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    /// ```
    /// use folio::domain::ArticleTitle;
    ///
    /// assert!(ArticleTitle::new("Hello world").is_ok());
    /// assert!(ArticleTitle::new("Hello").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let raw = raw.into();
        if utf16_len(&raw) > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong);
        }
        // Words are split on single spaces, so "a  b" counts as more than one.
        if raw.trim().split(' ').count() <= 1 {
            return Err(ArticleValidationError::TitleTooVague);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ArticleTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Body text of at least [`CONTENT_MIN`] UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent(String);

impl ArticleContent {
    pub fn new(raw: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let raw = raw.into();
        if utf16_len(&raw) < CONTENT_MIN {
            return Err(ArticleValidationError::ContentTooShort);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ArticleContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated title and content pair shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    title: ArticleTitle,
    content: ArticleContent,
}

impl ArticleDraft {
    /// Validate both fields, reporting the title first.
    pub fn try_from_parts(
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ArticleValidationError> {
        Ok(Self {
            title: ArticleTitle::new(title)?,
            content: ArticleContent::new(content)?,
        })
    }

    #[must_use]
    pub fn title(&self) -> &ArticleTitle {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &ArticleContent {
        &self.content
    }
}

/// Persisted article.
///
/// `slug` always equals `slugify(title, Some(id))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public author fields attached to reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthorSummary {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Article joined with its author summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleWithAuthor {
    #[serde(flatten)]
    pub article: Article,
    pub author: AuthorSummary,
}

/// Row written by `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Field changes applied by `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleChanges {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn content_of(len: usize) -> String {
        "x".repeat(len)
    }

    #[rstest]
    #[case("Hello world", true)]
    #[case("  Hello   world  ", true)]
    #[case("Hello", false)]
    #[case("   Hello   ", false)]
    #[case("", false)]
    fn titles_need_more_than_one_word(#[case] raw: &str, #[case] ok: bool) {
        let result = ArticleTitle::new(raw);
        assert_eq!(result.is_ok(), ok, "{raw:?}");
        if !ok {
            assert_eq!(result, Err(ArticleValidationError::TitleTooVague));
        }
    }

    #[rstest]
    fn title_length_is_capped() {
        let at_limit = format!("a {}", "b".repeat(TITLE_MAX - 2));
        assert!(ArticleTitle::new(at_limit).is_ok());

        let over = format!("a {}", "b".repeat(TITLE_MAX - 1));
        let error = ArticleTitle::new(over).expect_err("over the limit");
        assert_eq!(error.to_string(), "Title is too long");
        assert_eq!(error.field(), "title");
    }

    #[rstest]
    fn astral_characters_count_as_two_units() {
        // 79 emoji plus "a " is 160 units but only 81 chars.
        let at_limit = format!("a {}", "\u{1F980}".repeat(79));
        assert!(ArticleTitle::new(at_limit).is_ok());

        let over = format!("a {}", "\u{1F980}".repeat(80));
        assert_eq!(
            ArticleTitle::new(over),
            Err(ArticleValidationError::TitleTooLong)
        );

        let short = "\u{1F980}".repeat(CONTENT_MIN / 2 - 1) + "x";
        assert_eq!(
            ArticleContent::new(short),
            Err(ArticleValidationError::ContentTooShort)
        );
        assert!(ArticleContent::new("\u{1F980}".repeat(CONTENT_MIN / 2)).is_ok());
    }

    #[rstest]
    #[case(CONTENT_MIN - 1, false)]
    #[case(CONTENT_MIN, true)]
    #[case(CONTENT_MIN + 50, true)]
    fn content_has_a_minimum(#[case] len: usize, #[case] ok: bool) {
        assert_eq!(ArticleContent::new(content_of(len)).is_ok(), ok);
    }

    #[rstest]
    fn short_content_message_matches_form_copy() {
        let error = ArticleContent::new("short").expect_err("too short");
        assert_eq!(error.to_string(), "Description is not long enough");
        assert_eq!(error.field(), "content");
    }

    #[rstest]
    fn draft_reports_title_before_content() {
        let error = ArticleDraft::try_from_parts("Solo", "short").expect_err("invalid draft");
        assert_eq!(error, ArticleValidationError::TitleTooVague);
    }

    #[rstest]
    fn generated_ids_are_hex_without_separators() {
        let id = ArticleId::generate();
        assert_eq!(id.as_ref().len(), 32);
        assert!(id.as_ref().chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(id, ArticleId::generate());
    }

    #[rstest]
    #[case("", ArticleValidationError::EmptyId)]
    #[case("a b", ArticleValidationError::IdContainsWhitespace)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: ArticleValidationError) {
        assert_eq!(ArticleId::new(raw), Err(expected));
    }

    #[rstest]
    fn article_with_author_flattens_fields() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let view = ArticleWithAuthor {
            article: Article {
                id: ArticleId::new("a1").expect("id"),
                title: "Hello world".to_owned(),
                content: content_of(CONTENT_MIN),
                slug: "hello-world_a1".to_owned(),
                author_id: UserId::new("u1").expect("user id"),
                created_at: now,
                updated_at: now,
            },
            author: AuthorSummary {
                name: Some("Ada".to_owned()),
                image: None,
            },
        };
        let value = serde_json::to_value(&view).expect("serialise view");
        assert_eq!(value["slug"], "hello-world_a1");
        assert_eq!(value["authorId"], "u1");
        assert_eq!(value["author"]["name"], "Ada");
        assert!(value["createdAt"].is_string());
    }
}
