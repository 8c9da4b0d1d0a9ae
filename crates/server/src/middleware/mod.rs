//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only; capture errors and transactions)
//! 2. `TraceLayer` (`http_request` span with method, uri, status, latency)
//! 3. Request ID (record into span and Sentry scope, echo in response)
//! 4. CORS

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::request_id_middleware;
