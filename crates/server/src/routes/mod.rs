//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (store ping)
//!
//! # Cash payments
//! POST /cash-intent             - Issue a cashier code for a mobile number
//! GET  /cash-intents            - Pending intents, newest first
//! POST /verify-cashier-code     - Consume a cashier code
//! GET  /cashier-code-history    - Every issued code, newest first
//!
//! # Catalog
//! GET  /products                - Product listing
//! POST /products                - Add a product
//! GET  /products/{barcode}      - Barcode lookup
//!
//! # Customers
//! GET  /customers               - Customer listing
//! POST /customers               - Create or update by mobile
//! GET  /customers/{mobile}      - Customer lookup
//!
//! # Purchases
//! GET  /purchases               - All purchases, newest first
//! POST /purchases               - Save a purchase (cash clears the intent)
//! GET  /purchases/{mobile}      - One customer's purchases
//! ```

pub mod cash_intents;
pub mod customers;
pub mod extract;
pub mod health;
pub mod products;
pub mod purchases;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Cash payments
        .route("/cash-intent", post(cash_intents::create_intent))
        .route("/cash-intents", get(cash_intents::list_intents))
        .route("/verify-cashier-code", post(cash_intents::verify_code))
        .route("/cashier-code-history", get(cash_intents::list_history))
        // Catalog
        .route("/products", get(products::index).post(products::create))
        .route("/products/{barcode}", get(products::show))
        // Customers
        .route("/customers", get(customers::index).post(customers::upsert))
        .route("/customers/{mobile}", get(customers::show))
        // Purchases
        .route("/purchases", get(purchases::index).post(purchases::create))
        .route("/purchases/{mobile}", get(purchases::for_mobile))
}
