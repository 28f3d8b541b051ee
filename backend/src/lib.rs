//! Folio: article procedures, static pages and on-demand revalidation.
//!
//! - [`domain`]: article rules, caller guards, path codec and the
//!   revalidation worker, with the ports adapters implement.
//! - [`inbound`]: the Actix HTTP adapter.
//! - [`outbound`]: persistence, page runtime, queue and revalidation client.
//! - [`server`]: wiring used by the binary and integration tests.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
