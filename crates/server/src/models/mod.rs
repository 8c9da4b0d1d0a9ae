//! Domain models for the Smart Cart backend.
//!
//! These are the records the store hands back; they serialize directly into
//! the camelCase JSON the point-of-sale clients expect.

pub mod cash_intent;
pub mod customer;
pub mod product;
pub mod purchase;

pub use cash_intent::{CashIntent, CashierCodeRecord};
pub use customer::{Customer, NewCustomer};
pub use product::{NewProduct, Product};
pub use purchase::{NewPurchase, Purchase, PurchaseItem};
