//! Core types for Smart Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod id;
pub mod mobile;
pub mod price;
pub mod status;

pub use code::{CASH_INTENT_TTL_MINUTES, CashierCode, CashierCodeError};
pub use id::*;
pub use mobile::{Mobile, MobileError};
pub use price::{Price, PriceError};
pub use status::*;
