//! Smoke tests against a running server.
//!
//! Ignored by default. Start a server (the in-memory store is enough) and
//! point `SMART_CART_TEST_URL` at it:
//!
//! ```bash
//! SMART_CART_STORE=memory cargo run -p smart-cart-server &
//! SMART_CART_TEST_URL=http://127.0.0.1:5000 \
//!     cargo test -p smart-cart-integration-tests --test live_server -- --ignored
//! ```

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn base_url() -> String {
    std::env::var("SMART_CART_TEST_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_owned())
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_live_health() {
    let res = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("server reachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_live_cash_intent_round_trip() {
    let client = Client::new();
    let mobile = "9990007777";

    let issued: Value = client
        .post(format!("{}/cash-intent", base_url()))
        .json(&json!({ "name": "Live Test", "mobile": mobile }))
        .send()
        .await
        .expect("server reachable")
        .json()
        .await
        .expect("json body");
    let code = issued["cashierCode"].as_str().expect("code issued").to_owned();
    assert_eq!(code.len(), 6);

    let res = client
        .post(format!("{}/verify-cashier-code", base_url()))
        .json(&json!({ "mobile": mobile, "cashierCode": code }))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/verify-cashier-code", base_url()))
        .json(&json!({ "mobile": mobile, "cashierCode": code }))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
