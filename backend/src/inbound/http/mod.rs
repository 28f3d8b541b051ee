//! HTTP inbound adapter.
//!
//! - [`rpc`]: the `article.*` and `auth.*` procedures under `/api/trpc`.
//! - [`revalidate`]: `/api/revalidate`, the on-demand page rebuild hook.
//! - [`pages`]: cached static pages under `/article`.
//! - [`auth`]: development sign-in, mounted only when enabled.
//! - [`health`]: readiness and liveness probes.

pub mod auth;
pub mod cache_control;
pub mod caller;
pub mod error;
pub mod health;
pub mod pages;
pub mod revalidate;
pub mod rpc;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
