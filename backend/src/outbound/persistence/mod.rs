//! Article and user persistence.
//!
//! PostgreSQL adapters run on Diesel with `diesel-async` and a `bb8` pool.
//! Row structs and the table schema stay private; repositories translate rows
//! into domain types and map database failures onto port errors. The
//! in-memory adapters back local runs without a database.
//!
//! ```ignore
//! use folio::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/folio")).await?;
//! let articles = DieselArticleRepository::new(pool);
//! ```

mod diesel_article_repository;
mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod in_memory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use in_memory::{InMemoryArticleRepository, InMemoryUserRepository};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
