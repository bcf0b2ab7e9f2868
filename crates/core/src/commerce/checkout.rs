//! Checkout pricing.
//!
//! ```text
//! subtotal = Σ price × quantity
//! discount = promo discount (0 without a valid promo)
//! shipping = method price (0 with free-shipping promo or above threshold)
//! tax      = round(max(subtotal − discount, 0) × 0.08875)
//! total    = subtotal − discount + shipping + tax
//! ```

use serde::{Deserialize, Serialize};

use super::cart::{CartItem, subtotal};
use super::promo::AppliedPromo;
use super::shipping::ShippingMethod;
use super::tax::calculate_tax;
use crate::types::Cents;

/// Price breakdown of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Cents,
    pub discount: Cents,
    pub shipping: Cents,
    pub tax: Cents,
    pub total: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

impl OrderSummary {
    /// Price an order.
    ///
    /// `promo` must already be validated against the same subtotal.
    #[must_use]
    pub fn compute(
        items: &[CartItem],
        method: &ShippingMethod,
        promo: Option<&AppliedPromo>,
    ) -> Self {
        let subtotal = subtotal(items);
        let discount = promo.map_or(0, |p| p.discount.clamp(0, subtotal.max(0)));
        let free_shipping = promo.is_some_and(|p| p.free_shipping);
        let shipping = method.price_for(subtotal, free_shipping);
        let tax = calculate_tax(subtotal - discount);

        Self {
            subtotal,
            discount,
            shipping,
            tax,
            total: subtotal - discount + shipping + tax,
            promo_code: promo.map(|p| p.code.clone()),
        }
    }
}
