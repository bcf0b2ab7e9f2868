//! Orders created at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::cart::CartItem;
use super::checkout::OrderSummary;
use super::shipping::ShippingMethod;
use crate::types::{OrderId, OrderStatus};

/// Where an order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "ZIP code is required"))]
    pub zip_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

impl ShippingAddress {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A status change the order lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// An order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub shipping: ShippingAddress,
    pub shipping_method: ShippingMethod,
    pub summary: OrderSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A new pending order.
    #[must_use]
    pub fn pending(
        id: OrderId,
        items: Vec<CartItem>,
        shipping: ShippingAddress,
        shipping_method: ShippingMethod,
        summary: OrderSummary,
        now: DateTime<Utc>,
    ) -> Self {
        let promo_code = summary.promo_code.clone();
        Self {
            id,
            items,
            shipping,
            shipping_method,
            summary,
            promo_code,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the order to `next`, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] and leaves the order untouched if the
    /// lifecycle does not allow the move.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Whether the order was placed with this email (case-insensitive).
    #[must_use]
    pub fn placed_by(&self, email: &str) -> bool {
        self.shipping.email.eq_ignore_ascii_case(email.trim())
    }
}
