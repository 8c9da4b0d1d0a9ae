//! Smart Cart Core - Shared types library.
//!
//! This crate provides the domain types used across all Smart Cart components:
//! - `server` - REST backend for the point-of-sale cart
//! - `cli` - Command-line tools for migrations and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP handling. Database encoding is available behind the `postgres`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, mobiles, cashier codes, prices and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
