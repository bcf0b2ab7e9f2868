//! Wishlist route handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use guzel_core::Product;
use guzel_core::commerce::{Wishlist, WishlistItem};
use guzel_core::types::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::cart::{CartView, cart_item, find_product};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::{SessionCart, SessionWishlist, ValidatedJson};
use crate::state::AppState;

/// Wishlist as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub items: Vec<WishlistItem>,
    pub item_count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            item_count: wishlist.item_count(),
        }
    }
}

/// Result of a toggle: the wishlist plus whether the product is now saved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    #[serde(flatten)]
    pub wishlist: WishlistView,
    pub saved: bool,
}

/// Both collections after a move.
#[derive(Debug, Serialize)]
pub struct MoveToCartResponse {
    pub wishlist: WishlistView,
    pub cart: CartView,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveToCartRequest {
    pub product_id: ProductId,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    #[validate(length(min = 1, message = "Size is required"))]
    pub size: String,
}

fn wishlist_item(product: &Product, added_at: DateTime<Utc>) -> WishlistItem {
    WishlistItem {
        product_id: product.id.clone(),
        slug: product.slug.clone(),
        name: product.name.clone(),
        price: product.price,
        original_price: product.original_price,
        image: product.primary_image().to_string(),
        colors: product.colors.clone(),
        sizes: product.sizes.clone(),
        added_at,
    }
}

#[instrument(skip(wishlist))]
pub async fn show(wishlist: SessionWishlist) -> Json<WishlistView> {
    Json(WishlistView::from(&wishlist.wishlist))
}

/// Save a product. Saving it twice is a no-op.
#[instrument(skip(state, wishlist))]
pub async fn add(
    State(state): State<AppState>,
    mut wishlist: SessionWishlist,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<Json<WishlistView>> {
    let product = find_product(state.catalog(), &request.product_id)?;
    wishlist.wishlist.add(wishlist_item(product, Utc::now()));
    wishlist.save().await?;

    add_breadcrumb(
        "wishlist",
        "Saved product",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    Ok(Json(WishlistView::from(&wishlist.wishlist)))
}

#[instrument(skip(wishlist))]
pub async fn remove(
    mut wishlist: SessionWishlist,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<Json<WishlistView>> {
    if wishlist.wishlist.remove(&request.product_id) {
        wishlist.save().await?;
    }
    Ok(Json(WishlistView::from(&wishlist.wishlist)))
}

#[instrument(skip(state, wishlist))]
pub async fn toggle(
    State(state): State<AppState>,
    mut wishlist: SessionWishlist,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<Json<ToggleResponse>> {
    let product = find_product(state.catalog(), &request.product_id)?;
    let saved = wishlist.wishlist.toggle(wishlist_item(product, Utc::now()));
    wishlist.save().await?;

    Ok(Json(ToggleResponse {
        wishlist: WishlistView::from(&wishlist.wishlist),
        saved,
    }))
}

/// Move a saved product into the cart as one unit of the chosen variant.
///
/// Products that are not saved leave both collections unchanged.
#[instrument(skip(state, wishlist, cart))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    mut wishlist: SessionWishlist,
    mut cart: SessionCart,
    ValidatedJson(request): ValidatedJson<MoveToCartRequest>,
) -> Result<Json<MoveToCartResponse>> {
    let product = find_product(state.catalog(), &request.product_id)?;
    let variant = cart_item(product, &request.color, &request.size, 1)?;

    let moved = wishlist.wishlist.move_to_cart(
        &request.product_id,
        variant.color,
        variant.size,
        &mut cart.cart,
    );
    if moved {
        wishlist.save().await?;
        cart.save().await?;
        tracing::info!(product_id = %request.product_id, "Moved wishlist item to cart");
    }

    Ok(Json(MoveToCartResponse {
        wishlist: WishlistView::from(&wishlist.wishlist),
        cart: CartView::from(&cart.cart),
    }))
}

#[instrument(skip(wishlist))]
pub async fn clear(mut wishlist: SessionWishlist) -> Result<Json<WishlistView>> {
    wishlist.wishlist.clear();
    wishlist.save().await?;
    Ok(Json(WishlistView::from(&wishlist.wishlist)))
}
