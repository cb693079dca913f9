//! Shared cache-control policies for HTTP handlers.

/// Polled order listings must never be served from a cache.
pub const NO_STORE: &str = "no-store";

/// Build the cache-control header tuple for polled responses.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
