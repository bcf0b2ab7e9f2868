//! Shopping cart.
//!
//! A cart line is identified by `(product_id, color name, size)`: adding the
//! same variant twice merges into one line. Quantities are kept between 1 and
//! [`MAX_QUANTITY`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::ColorOption;
use crate::types::{Cents, ProductId};

/// Maximum quantity of a single cart line.
pub const MAX_QUANTITY: u32 = 10;

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    /// Unit price in cents.
    #[validate(range(min = 1))]
    pub price: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Cents>,
    pub image: String,
    pub color: ColorOption,
    pub size: String,
    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
}

impl CartItem {
    /// Price of the line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Cents {
        self.price * Cents::from(self.quantity)
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.color.name == key.color && self.size == key.size
    }

    /// Display name used on payment line items, e.g. `Dress (Cream / M)`.
    #[must_use]
    pub fn variant_label(&self) -> String {
        format!("{} ({} / {})", self.name, self.color.name, self.size)
    }
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    /// Color name.
    pub color: String,
    pub size: String,
}

impl From<&CartItem> for LineKey {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            color: item.color.name.clone(),
            size: item.size.clone(),
        }
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging with an existing line of the same variant.
    pub fn add(&mut self, item: CartItem) {
        let key = LineKey::from(&item);
        if let Some(existing) = self.items.iter_mut().find(|line| line.matches(&key)) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_QUANTITY);
        } else {
            let quantity = item.quantity.clamp(1, MAX_QUANTITY);
            self.items.push(CartItem { quantity, ..item });
        }
    }

    /// Remove a line. Returns `true` if a line was removed.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| !line.matches(key));
        self.items.len() != before
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line; larger quantities are
    /// capped at [`MAX_QUANTITY`]. Unknown lines are left alone.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            self.remove(key);
            return;
        };
        if quantity == 0 {
            self.remove(key);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.matches(key)) {
            line.quantity = quantity.min(MAX_QUANTITY);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Cents {
        subtotal(&self.items)
    }

    /// Whether the product is in the cart, optionally narrowed to a color
    /// and/or size.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId, color: Option<&str>, size: Option<&str>) -> bool {
        self.items.iter().any(|line| {
            &line.product_id == product_id
                && color.is_none_or(|c| line.color.name == c)
                && size.is_none_or(|s| line.size == s)
        })
    }
}

/// Sum of `price * quantity` over a list of lines.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Cents {
    items.iter().map(CartItem::line_total).sum()
}
