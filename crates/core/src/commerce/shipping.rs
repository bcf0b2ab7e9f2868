//! Shipping methods and shipping price resolution.

use serde::{Deserialize, Serialize};

use crate::types::Cents;

/// A carrier tier with a flat price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Flat price in cents.
    pub price: Cents,
    pub estimated_days: String,
    /// Orders with a subtotal at or above this amount ship free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_above: Option<Cents>,
}

impl ShippingMethod {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        price: Cents,
        estimated_days: &str,
        free_above: Option<Cents>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            estimated_days: estimated_days.to_string(),
            free_above,
        }
    }

    /// Price of this method for an order.
    ///
    /// Free when a free-shipping promo applies or the subtotal reaches the
    /// method's threshold; the flat price otherwise.
    #[must_use]
    pub fn price_for(&self, subtotal: Cents, free_shipping_promo: bool) -> Cents {
        if free_shipping_promo {
            return 0;
        }
        match self.free_above {
            Some(threshold) if threshold > 0 && subtotal >= threshold => 0,
            _ => self.price,
        }
    }
}

/// The shipping methods offered at checkout.
#[must_use]
pub fn builtin_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod::new(
            "standard",
            "Standard Shipping",
            "Delivered by postal service",
            799,
            "5-7 business days",
            Some(15_000),
        ),
        ShippingMethod::new(
            "express",
            "Express Shipping",
            "Priority delivery",
            1_499,
            "2-3 business days",
            Some(25_000),
        ),
        ShippingMethod::new(
            "overnight",
            "Next Day Delivery",
            "Order by 2PM for next day",
            2_499,
            "1 business day",
            None,
        ),
    ]
}

/// Find a method by id.
#[must_use]
pub fn find_method<'a>(methods: &'a [ShippingMethod], id: &str) -> Option<&'a ShippingMethod> {
    methods.iter().find(|method| method.id == id)
}
