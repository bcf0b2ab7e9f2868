//! Wishlist: saved products, one entry per product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartItem};
use crate::catalog::ColorOption;
use crate::types::{Cents, ProductId};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Cents>,
    pub image: String,
    pub colors: Vec<ColorOption>,
    pub sizes: Vec<String>,
    pub added_at: DateTime<Utc>,
}

/// The visitor's wishlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }

    /// Add an entry unless the product is already saved.
    pub fn add(&mut self, item: WishlistItem) {
        if !self.contains(&item.product_id) {
            self.items.push(item);
        }
    }

    /// Remove a product. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Remove the product if saved, add it otherwise.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.remove(&item.product_id) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Move a saved product into the cart as a single unit of the chosen
    /// variant.
    ///
    /// Returns `false` (and leaves both untouched) if the product is not
    /// saved.
    pub fn move_to_cart(
        &mut self,
        product_id: &ProductId,
        color: ColorOption,
        size: String,
        cart: &mut Cart,
    ) -> bool {
        let Some(index) = self.items.iter().position(|item| &item.product_id == product_id) else {
            return false;
        };
        let saved = self.items.remove(index);
        cart.add(CartItem {
            product_id: saved.product_id,
            slug: saved.slug,
            name: saved.name,
            price: saved.price,
            original_price: saved.original_price,
            image: saved.image,
            color,
            size,
            quantity: 1,
        });
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn saved(product: &str) -> WishlistItem {
        WishlistItem {
            product_id: ProductId::new(product),
            slug: format!("product-{product}"),
            name: format!("Product {product}"),
            price: 14_500,
            original_price: Some(16_000),
            image: "https://example.com/p.jpg".to_string(),
            colors: vec![ColorOption {
                name: "Rust".to_string(),
                hex: "#B7664F".to_string(),
            }],
            sizes: vec!["S".to_string(), "M".to_string()],
            added_at: Utc::now(),
        }
    }

    fn rust_color() -> ColorOption {
        ColorOption {
            name: "Rust".to_string(),
            hex: "#B7664F".to_string(),
        }
    }

    #[test]
    fn test_add_is_idempotent_per_product() {
        let mut wishlist = Wishlist::new();
        wishlist.add(saved("1"));
        wishlist.add(saved("1"));
        wishlist.add(saved("2"));
        assert_eq!(wishlist.item_count(), 2);
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(saved("1")));
        assert!(wishlist.contains(&ProductId::new("1")));
        assert!(!wishlist.toggle(saved("1")));
        assert!(!wishlist.contains(&ProductId::new("1")));
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::new();
        wishlist.add(saved("1"));
        assert!(wishlist.remove(&ProductId::new("1")));
        assert!(!wishlist.remove(&ProductId::new("1")));
    }

    #[test]
    fn test_move_to_cart() {
        let mut wishlist = Wishlist::new();
        let mut cart = Cart::new();
        wishlist.add(saved("16"));

        let moved = wishlist.move_to_cart(
            &ProductId::new("16"),
            rust_color(),
            "M".to_string(),
            &mut cart,
        );

        assert!(moved);
        assert_eq!(wishlist.item_count(), 0);
        assert_eq!(cart.items().len(), 1);
        let line = &cart.items()[0];
        assert_eq!(line.quantity, 1);
        assert_eq!(line.size, "M");
        assert_eq!(line.price, 14_500);
        assert_eq!(line.original_price, Some(16_000));
    }

    #[test]
    fn test_move_unknown_product_is_noop() {
        let mut wishlist = Wishlist::new();
        let mut cart = Cart::new();
        wishlist.add(saved("1"));
        assert!(!wishlist.move_to_cart(
            &ProductId::new("2"),
            rust_color(),
            "M".to_string(),
            &mut cart
        ));
        assert_eq!(wishlist.item_count(), 1);
        assert!(cart.is_empty());
    }
}
