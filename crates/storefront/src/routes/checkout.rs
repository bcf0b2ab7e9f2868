//! Checkout route handler.
//!
//! Turns a cart and shipping details into a pending order and an Allpay
//! payment page. Totals are always recomputed from the catalog, shipping
//! table and promo rules; anything the client says about prices is ignored.

use axum::{Json, extract::State};
use chrono::Utc;
use guzel_core::Catalog;
use guzel_core::commerce::{CartItem, Order, OrderSummary, ShippingAddress, find_method};
use guzel_core::types::OrderId;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use validator::Validate;

use super::cart::cart_item;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ValidatedJson, clear_cart};
use crate::payments::{PaymentRequest, line_items};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Cart is empty"), nested)]
    pub items: Vec<CartItem>,
    #[validate(nested)]
    pub shipping: ShippingAddress,
    #[validate(length(min = 1, message = "Shipping method is required"))]
    pub shipping_method_id: String,
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Where to send the shopper to pay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// The order id.
    pub session_id: String,
    /// Allpay's hosted payment page.
    pub url: String,
}

/// Rebuild cart lines from the catalog, keeping only the variant and quantity
/// the client chose.
fn reprice(catalog: &Catalog, items: &[CartItem]) -> Result<Vec<CartItem>> {
    items
        .iter()
        .map(|item| {
            let product = catalog.by_id(&item.product_id).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown product: {}", item.product_id))
            })?;
            cart_item(product, &item.color.name, &item.size, item.quantity)
        })
        .collect()
}

/// Empty the shopper's cart once their order exists.
///
/// Returns `false` if the session could not be updated. The order and its
/// payment page are already in place by then, so this only logs.
async fn forget_cart(session: &Session, order_id: OrderId) -> bool {
    match clear_cart(session).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%order_id, error = %err, "Failed to clear cart after checkout");
            false
        }
    }
}

/// Create a pending order and an Allpay payment session.
#[instrument(
    skip(state, session, request),
    fields(items = request.items.len(), shipping_method = %request.shipping_method_id)
)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let now = Utc::now();
    let method = find_method(state.shipping_methods(), &request.shipping_method_id)
        .ok_or_else(|| AppError::BadRequest("Invalid shipping method".to_string()))?;

    let items = reprice(state.catalog(), &request.items)?;
    let subtotal = guzel_core::commerce::cart::subtotal(&items);

    // An unusable promo is dropped rather than failing the checkout
    let promo = request
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .and_then(|code| match state.promos().validate(code, subtotal, now) {
            Ok(applied) => Some(applied),
            Err(rejection) => {
                tracing::info!(code, %rejection, "Ignoring promo code at checkout");
                None
            }
        });
    let summary = OrderSummary::compute(&items, method, promo.as_ref());

    let allpay = state.allpay().ok_or(AppError::PaymentNotConfigured)?;

    let order_id = OrderId::generate();
    let config = state.config();
    let payment = PaymentRequest::new(
        allpay.login(),
        order_id,
        line_items(&items, method, &summary),
        &request.shipping,
        config.webhook_url(),
        config.success_url(&order_id.to_string()),
    );

    let url = allpay.create_payment(&payment).await?;

    let order = Order::pending(
        order_id,
        items,
        request.shipping,
        method.clone(),
        summary,
        now,
    );
    tracing::info!(
        order_id = %order.id,
        total = order.summary.total,
        promo_code = order.promo_code.as_deref().unwrap_or(""),
        "Order created"
    );
    state.orders().insert(order).await;

    forget_cart(&session, order_id).await;
    let session_id = order_id.to_string();
    add_breadcrumb(
        "checkout",
        "Payment session created",
        Some(&[("order_id", session_id.as_str())]),
    );

    Ok(Json(CheckoutResponse { session_id, url }))
}
