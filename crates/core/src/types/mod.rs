//! Core types for the Güzel storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{Cents, format_cents};
pub use status::OrderStatus;
