//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod article_command;
mod article_query;
mod article_repository;
mod revalidation_client;
mod revalidation_scheduler;
mod static_pages;
mod user_repository;

#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::{
    ArticleCommand, CreateArticleRequest, DeleteArticleRequest, UpdateArticleRequest,
};
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::ArticleQuery;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use revalidation_client::MockRevalidationClient;
pub use revalidation_client::{RevalidationClient, RevalidationClientError};
#[cfg(test)]
pub use revalidation_scheduler::MockRevalidationScheduler;
pub use revalidation_scheduler::{JobDispatchError, RevalidationScheduler};
#[cfg(test)]
pub use static_pages::{MockPageRegenerator, MockStaticPages};
pub use static_pages::{PageRegenerator, Regeneration, RegenerationError, StaticPage, StaticPages};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
