//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: Diesel/PostgreSQL and in-memory article and user stores
//! - **pages**: in-process static page cache and renderer
//! - **queue**: bounded Tokio channel feeding the revalidation worker
//! - **revalidation**: reqwest client for the revalidation endpoint
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business rules.

pub mod pages;
pub mod persistence;
pub mod queue;
pub mod revalidation;
