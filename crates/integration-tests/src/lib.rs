//! Integration tests for the Smart Cart backend.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests against the in-memory store
//! cargo test -p smart-cart-integration-tests
//!
//! # Live tests against a running server
//! SMART_CART_TEST_URL=http://127.0.0.1:5000 \
//!     cargo test -p smart-cart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cash_intents` - Cashier-code issue, verify, expiry, history
//! - `catalog` - Products, customers, purchases
//! - `live_server` - Smoke tests over HTTP (ignored by default)

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use smart_cart_server::db::MemoryStore;
use smart_cart_server::services::{ManualClock, SequenceCodeGenerator};
use smart_cart_server::{AppState, build_router, middleware};

/// The fixed instant every [`TestApp`] clock starts at.
#[must_use]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The full router over an in-memory store, with a hand-driven clock and
/// predictable cashier codes.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub body: Value,
}

impl TestApp {
    /// App whose code generator hands out `codes` in order.
    #[must_use]
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let state = AppState::new(
            store.clone(),
            clock.clone(),
            Arc::new(SequenceCodeGenerator::new(codes)),
        );

        Self {
            router: build_router(state, middleware::cors_layer(&[])),
            store,
            clock,
        }
    }

    /// App that issues "482913" for every intent.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codes(["482913"])
    }

    /// Send `GET uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty())).await
    }

    /// Send `POST uri` with a JSON body.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.post_raw(uri, &body.to_string()).await
    }

    /// Send `POST uri` with `body` verbatim as `application/json`.
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned())),
        )
        .await
    }

    async fn send(&self, request: axum::http::Result<Request<Body>>) -> TestResponse {
        let request = request.expect("valid request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
