//! Domain primitives, aggregates and services.
//!
//! Purpose: keep article rules, caller guards and the revalidation protocol
//! independent of HTTP and storage. Adapters reach the domain only through the
//! [`ports`] traits.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `Caller`: explicit caller context passed to every procedure.
//! - `Article*`: the article aggregate and validated inputs.
//! - `PathCodec`: encryption of revalidation paths.
//! - `ArticleService`, `RevalidationWorker`: use-cases behind the ports.

pub mod article;
pub mod article_service;
pub mod caller;
pub mod error;
pub mod path_codec;
pub mod ports;
pub mod revalidation;
pub mod revalidation_worker;
pub mod slug;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::article::{
    Article, ArticleChanges, ArticleContent, ArticleDraft, ArticleId, ArticleTitle,
    ArticleValidationError, ArticleWithAuthor, AuthorSummary, CONTENT_MIN, NewArticle, TITLE_MAX,
};
pub use self::article_service::{
    ArticleService, DELETE_FORBIDDEN_MESSAGE, UPDATE_FORBIDDEN_MESSAGE,
};
pub use self::caller::{ADMIN_REQUIRED_MESSAGE, Caller, CallerIdentity, LOGIN_REQUIRED_MESSAGE};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::path_codec::{CipherAlgorithm, EncryptedPath, PathCodec, PathCodecError};
pub use self::revalidation::{
    ARTICLE_PAGE, INVALID_METHOD_MESSAGE, INVALID_PAYLOAD_MESSAGE, INVALIDATION_ERROR_MESSAGE,
    PATH_REQUIRED_MESSAGE, PagePath, RevalidationResponse, RevalidationTarget,
};
pub use self::revalidation_worker::{
    BackoffJitter, RetrySleeper, RevalidationJobOutcome, RevalidationWorker,
    RevalidationWorkerConfig, RevalidationWorkerRuntime,
};
pub use self::slug::{extract_id_from_slug, is_valid_article_slug, slugify};
pub use self::trace_id::TraceId;
pub use self::user::{Role, User, UserId, UserValidationError};
