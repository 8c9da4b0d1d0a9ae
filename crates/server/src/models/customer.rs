//! Customers recorded at checkout.

use chrono::{DateTime, Utc};
use serde::Serialize;

use smart_cart_core::{CustomerId, Mobile};

/// A customer, identified by mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub mobile: Mobile,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for recording a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub mobile: Mobile,
    pub email: Option<String>,
}
