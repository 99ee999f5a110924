//! HTTP middleware stack for the catalog proxy.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (record on span, echo on response)
//! 4. CORS (fixed headers on every response, answers pre-flight)

pub mod cors;
pub mod request_id;

pub use cors::cors_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
