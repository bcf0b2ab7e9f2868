//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Catalog
//! GET  /api/products               - Product listing (filter/sort query)
//! GET  /api/products/{slug}        - Product detail with related products
//! GET  /api/search?q=              - Search by name or category (max 5)
//! GET  /api/categories             - Category names
//! GET  /api/shipping-methods       - Shipping methods
//!
//! # Cart (session)
//! GET  /api/cart                   - Cart with item count and subtotal
//! POST /api/cart/add               - Add a variant
//! POST /api/cart/update            - Set a line's quantity
//! POST /api/cart/remove            - Remove a line
//! POST /api/cart/clear             - Empty the cart
//!
//! # Wishlist (session)
//! GET  /api/wishlist               - Saved products
//! POST /api/wishlist/add           - Save a product
//! POST /api/wishlist/remove        - Forget a product
//! POST /api/wishlist/toggle        - Save or forget a product
//! POST /api/wishlist/move-to-cart  - Move a saved product into the cart
//! POST /api/wishlist/clear         - Empty the wishlist
//!
//! # Checkout & orders
//! POST /api/checkout               - Create an order and an Allpay payment page
//! POST /api/promo/validate         - Check a promo code
//! GET  /api/orders?email=          - Orders placed with an email
//! GET  /api/orders/{id}            - Order detail
//! POST /api/webhook                - Allpay payment notification
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod promo;
pub mod webhook;
pub mod wishlist;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::middleware::{
    RateLimiterLayer, api_rate_limiter, checkout_rate_limiter, rate_limited_json,
};
use crate::state::AppState;

/// Wrap `router` in a rate limiter when limiting is enabled.
fn limited(
    router: Router<AppState>,
    limiter: impl FnOnce() -> RateLimiterLayer,
    enabled: bool,
) -> Router<AppState> {
    if enabled {
        router
            .layer(limiter())
            .layer(axum_middleware::map_response(rate_limited_json))
    } else {
        router
    }
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/search", get(products::search))
        .route("/categories", get(products::categories))
        .route("/shipping-methods", get(products::shipping_methods))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
        .route("/move-to-cart", post(wishlist::move_to_cart))
        .route("/clear", post(wishlist::clear))
}

/// Create the checkout and promo routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::create))
        .route("/promo/validate", post(promo::validate))
}

/// Create the order lookup routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
///
/// With `rate_limit` set, cart and wishlist routes get the relaxed API
/// limiter and checkout/promo the strict one. The webhook is never limited.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .nest("/cart", limited(cart_routes(), api_rate_limiter, rate_limit))
        .nest(
            "/wishlist",
            limited(wishlist_routes(), api_rate_limiter, rate_limit),
        )
        .merge(limited(checkout_routes(), checkout_rate_limiter, rate_limit))
        .nest("/orders", order_routes())
        .route("/webhook", post(webhook::receive));

    Router::new().nest("/api", api)
}
