//! Cache-control policies shared by the HTTP handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Per-caller responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Static pages stay cached at the edge until revalidated.
pub const STATIC_PAGE_CACHE: &str = "s-maxage=31536000, stale-while-revalidate";

pub fn private_no_cache_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

pub fn static_page_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, STATIC_PAGE_CACHE)
}
