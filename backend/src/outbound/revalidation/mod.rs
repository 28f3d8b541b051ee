//! Revalidation client adapter and its configuration.

mod config;
mod http_client;

pub use config::{RevalidationConfigError, RevalidationSettings};
pub use http_client::HttpRevalidationClient;
