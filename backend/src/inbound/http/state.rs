//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain ports,
//! so they can be exercised with mocks and in-memory adapters.

use std::sync::Arc;

use crate::domain::PathCodec;
use crate::domain::ports::{
    ArticleCommand, ArticleQuery, PageRegenerator, StaticPages, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub articles: Arc<dyn ArticleQuery>,
    pub article_commands: Arc<dyn ArticleCommand>,
    /// Resolves the session user into a caller.
    pub users: Arc<dyn UserRepository>,
    pub pages: Arc<dyn StaticPages>,
    pub regenerator: Arc<dyn PageRegenerator>,
    /// Decrypts revalidation payloads.
    pub codec: Arc<PathCodec>,
}
