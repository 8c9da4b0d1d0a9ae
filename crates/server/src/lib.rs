//! Smart Cart backend library.
//!
//! REST backend for a smart-cart point of sale: barcode catalog, customers,
//! purchases, and the cash-payment handshake where a customer's cart shows a
//! short cashier code that the till must confirm.
//!
//! The router is built here so integration tests can drive it in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use state::AppState;

/// Build the application with its tracing, request ID and CORS layers.
///
/// Sentry layers are added by the binary on top of this.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    routes::routes()
        .layer(cors)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryStore;
    use crate::middleware::request_id::REQUEST_ID_HEADER;
    use crate::services::{RandomCodeGenerator, SystemClock};

    fn app(store: Arc<MemoryStore>) -> Router {
        let state = AppState::new(
            store,
            Arc::new(SystemClock),
            Arc::new(RandomCodeGenerator::default()),
        );
        build_router(state, middleware::cors_layer(&[]))
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "till-7-0001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "till-7-0001");
    }

    #[tokio::test]
    async fn test_readiness_reports_store_outage() {
        let store = Arc::new(MemoryStore::new());
        let response = app(store.clone())
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        store.set_offline(true);
        let response = app(store)
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
