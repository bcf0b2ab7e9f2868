//! Shopping and checkout logic.
//!
//! Everything here is a pure function of its inputs. Sessions, the order
//! store and the payment provider live in the storefront crate.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod promo;
pub mod shipping;
pub mod tax;
pub mod wishlist;

pub use cart::{Cart, CartItem, LineKey, MAX_QUANTITY};
pub use checkout::OrderSummary;
pub use order::{InvalidTransition, Order, ShippingAddress};
pub use promo::{AppliedPromo, PromoCatalog, PromoCode, PromoKind, PromoRejection};
pub use shipping::{ShippingMethod, builtin_methods, find_method};
pub use tax::{TAX_RATE, calculate_tax};
pub use wishlist::{Wishlist, WishlistItem};
