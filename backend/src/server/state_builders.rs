//! Assemble ports into [`HttpState`] and the revalidation job pipeline.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ArticleRepository, RevalidationScheduler, UserRepository};
use crate::domain::{ArticleService, PathCodec, Role, User, UserId, UserValidationError};
use crate::inbound::http::state::HttpState;
use crate::outbound::pages::StaticPageRuntime;
use crate::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselUserRepository, InMemoryArticleRepository,
    InMemoryUserRepository,
};
use crate::outbound::queue::{RevalidationJobReceiver, TokioRevalidationQueue};

/// Identifier of the user seeded into in-memory storage.
pub const DEMO_USER_ID: &str = "demo-user";

/// Backing store for articles and users.
pub enum Storage {
    Postgres(DbPool),
    InMemory(Arc<InMemoryUserRepository>),
}

impl Storage {
    /// In-memory storage holding a single demo author.
    ///
    /// # Errors
    ///
    /// Fails only if [`DEMO_USER_ID`] stops being a valid user id.
    pub fn in_memory_with_demo_user() -> Result<Self, UserValidationError> {
        let demo = User::new(
            UserId::new(DEMO_USER_ID)?,
            Some("Demo author".to_owned()),
            None,
            Role::User,
        );
        Ok(Self::InMemory(Arc::new(InMemoryUserRepository::with_users([
            demo,
        ]))))
    }
}

/// Everything the HTTP factory and the revalidation worker need.
pub struct AppServices {
    pub http_state: HttpState,
    pub jobs: RevalidationJobReceiver,
}

fn wire<R>(
    articles: Arc<R>,
    users: Arc<dyn UserRepository>,
    scheduler: Arc<dyn RevalidationScheduler>,
    codec: Arc<PathCodec>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    R: ArticleRepository + 'static,
{
    let service = Arc::new(ArticleService::new(articles, scheduler, clock.clone()));
    let pages = Arc::new(StaticPageRuntime::new(service.clone(), clock));
    HttpState {
        articles: service.clone(),
        article_commands: service,
        users,
        pages: pages.clone(),
        regenerator: pages,
        codec,
    }
}

/// Build the HTTP state over `storage` plus the queue feeding the worker.
#[must_use]
pub fn build_services(
    storage: Storage,
    codec: Arc<PathCodec>,
    queue_capacity: usize,
    clock: Arc<dyn Clock>,
) -> AppServices {
    let (queue, jobs) = TokioRevalidationQueue::channel(queue_capacity);
    let scheduler: Arc<dyn RevalidationScheduler> = Arc::new(queue);
    let http_state = match storage {
        Storage::Postgres(pool) => {
            info!("using PostgreSQL storage");
            wire(
                Arc::new(DieselArticleRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool)),
                scheduler,
                codec,
                clock,
            )
        }
        Storage::InMemory(users) => {
            info!("using in-memory storage");
            wire(
                Arc::new(InMemoryArticleRepository::new(users.clone())),
                users,
                scheduler,
                codec,
                clock,
            )
        }
    };
    AppServices { http_state, jobs }
}
