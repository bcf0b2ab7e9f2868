//! Allpay payment provider integration.
//!
//! # Flow
//!
//! 1. Checkout builds a [`PaymentRequest`] from the order, signs it and
//!    posts it to Allpay ([`AllpayClient::create_payment`]).
//! 2. Allpay answers with a hosted payment page URL; the shopper pays there.
//! 3. Allpay calls `/api/webhook` with a signed [`Notification`]; status `1`
//!    marks the order paid.
//!
//! Both directions use the signature scheme in [`guzel_core::signature`].

mod client;
mod error;
mod types;

pub use client::AllpayClient;
pub use error::PaymentError;
pub use types::{AllpayItem, CURRENCY, Notification, PaymentRequest, PaymentResponse, line_items};
