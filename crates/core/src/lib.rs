//! Güzel Core - Shop domain library.
//!
//! Shared by the `storefront` HTTP server and the `cli` operator tool:
//!
//! - [`types`] - Money, identifiers and order status
//! - [`catalog`] - The product catalog and its browsing queries
//! - [`commerce`] - Cart, wishlist, promo codes, shipping, tax, checkout
//!   pricing and orders
//! - [`signature`] - Allpay payload signing and verification
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Rules that depend on the current time take it as an
//! argument.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod commerce;
pub mod signature;
pub mod types;

pub use catalog::{Catalog, ColorOption, Product, ProductFilter, ProductSort};
pub use types::*;
