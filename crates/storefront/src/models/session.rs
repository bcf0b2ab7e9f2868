//! Session-related types.
//!
//! The visitor's cart and wishlist are stored in the server-side session,
//! keyed by the session cookie.

/// Session keys for shopper state.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's wishlist.
    pub const WISHLIST: &str = "wishlist";
}
