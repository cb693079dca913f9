//! Canteen ordering backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds validated types,
//! services, and ports; [`inbound`] adapts HTTP requests onto the driving
//! ports; [`outbound`] implements the driven ports against PostgreSQL, an
//! in-memory store, and the credential and token primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
