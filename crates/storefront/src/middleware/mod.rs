//! HTTP middleware and extractors for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! The admin gate is an extractor rather than a layer so it can be attached
//! per handler.

pub mod auth;
pub mod request_id;

pub use auth::{AdminRejection, RequireAdmin};
pub use request_id::request_id_middleware;
