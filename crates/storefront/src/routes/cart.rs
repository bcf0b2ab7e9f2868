//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Line items are always built from
//! the catalog, so prices sent by the client are never trusted.

use axum::{Json, extract::State};
use guzel_core::commerce::{Cart, CartItem, LineKey};
use guzel_core::types::{Cents, ProductId};
use guzel_core::{Catalog, Product};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{SessionCart, ValidatedJson};
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Cents,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Color name.
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    #[validate(length(min = 1, message = "Size is required"))]
    pub size: String,
    #[validate(range(min = 1, max = 10))]
    pub quantity: Option<u32>,
}

/// Update quantity request. Zero or less removes the line.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    #[serde(flatten)]
    pub line: LineKey,
    pub quantity: i64,
}

/// Remove line request.
#[derive(Debug, Deserialize, Validate)]
pub struct RemoveFromCartRequest {
    #[serde(flatten)]
    pub line: LineKey,
}

/// Look up a product by id or fail with 404.
pub(crate) fn find_product<'a>(catalog: &'a Catalog, id: &ProductId) -> Result<&'a Product> {
    catalog
        .by_id(id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Build a cart line for a variant of `product`.
///
/// # Errors
///
/// Returns 400 if the product has no such color or size.
pub(crate) fn cart_item(
    product: &Product,
    color: &str,
    size: &str,
    quantity: u32,
) -> Result<CartItem> {
    let color = product
        .color(color)
        .cloned()
        .ok_or_else(|| AppError::BadRequest(format!("Invalid color: {color}")))?;
    if !product.has_size(size) {
        return Err(AppError::BadRequest(format!("Invalid size: {size}")));
    }

    Ok(CartItem {
        product_id: product.id.clone(),
        slug: product.slug.clone(),
        name: product.name.clone(),
        price: product.price,
        original_price: product.original_price,
        image: product.primary_image().to_string(),
        color,
        size: size.to_string(),
        quantity,
    })
}

/// Show the cart.
#[instrument(skip(cart))]
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(CartView::from(&cart.cart))
}

/// Add a product variant to the cart.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    ValidatedJson(request): ValidatedJson<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = find_product(state.catalog(), &request.product_id)?;
    let item = cart_item(
        product,
        &request.color,
        &request.size,
        request.quantity.unwrap_or(1),
    )?;

    cart.cart.add(item);
    cart.save().await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", request.product_id.as_str())]),
    );
    tracing::info!(product_id = %request.product_id, "Added item to cart");

    Ok(Json(CartView::from(&cart.cart)))
}

/// Change the quantity of a line.
#[instrument(skip(cart))]
pub async fn update(
    mut cart: SessionCart,
    ValidatedJson(request): ValidatedJson<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    cart.cart.update_quantity(&request.line, request.quantity);
    cart.save().await?;
    Ok(Json(CartView::from(&cart.cart)))
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(
    mut cart: SessionCart,
    ValidatedJson(request): ValidatedJson<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    if cart.cart.remove(&request.line) {
        cart.save().await?;
    }
    Ok(Json(CartView::from(&cart.cart)))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(mut cart: SessionCart) -> Result<Json<CartView>> {
    cart.cart.clear();
    cart.save().await?;
    Ok(Json(CartView::from(&cart.cart)))
}
