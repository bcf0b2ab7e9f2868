//! Allpay wire types.

use guzel_core::commerce::{CartItem, OrderSummary, ShippingAddress, ShippingMethod};
use guzel_core::types::{Cents, OrderId, money};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Currency every payment is charged in.
pub const CURRENCY: &str = "USD";

/// A line on the Allpay payment page. Prices are in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllpayItem {
    pub name: String,
    pub price: f64,
    pub qty: u32,
    pub vat: u32,
}

impl AllpayItem {
    fn new(name: impl Into<String>, cents: Cents, qty: u32) -> Self {
        Self {
            name: name.into(),
            price: dollars(cents),
            qty,
            vat: 0,
        }
    }
}

fn dollars(cents: Cents) -> f64 {
    money::to_dollars(cents).to_f64().unwrap_or_default()
}

/// Build the payment page lines for an order.
///
/// One line per cart item, then shipping and tax when non-zero, then the
/// discount as a negative line.
#[must_use]
pub fn line_items(
    items: &[CartItem],
    method: &ShippingMethod,
    summary: &OrderSummary,
) -> Vec<AllpayItem> {
    let mut lines: Vec<AllpayItem> = items
        .iter()
        .map(|item| AllpayItem::new(item.variant_label(), item.price, item.quantity))
        .collect();

    if summary.shipping > 0 {
        lines.push(AllpayItem::new(method.name.as_str(), summary.shipping, 1));
    }
    if summary.tax > 0 {
        lines.push(AllpayItem::new("Tax", summary.tax, 1));
    }
    if summary.discount > 0 {
        let code = summary.promo_code.as_deref().unwrap_or_default();
        lines.push(AllpayItem::new(
            format!("Discount ({})", code.to_uppercase()),
            -summary.discount,
            1,
        ));
    }

    lines
}

/// Body of a payment-creation request, before signing.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub login: String,
    pub order_id: String,
    pub items: Vec<AllpayItem>,
    pub currency: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub webhook_url: String,
    pub success_url: String,
}

impl PaymentRequest {
    /// Request for an order placed by `customer`.
    #[must_use]
    pub fn new(
        login: &str,
        order_id: OrderId,
        items: Vec<AllpayItem>,
        customer: &ShippingAddress,
        webhook_url: String,
        success_url: String,
    ) -> Self {
        Self {
            login: login.to_string(),
            order_id: order_id.to_string(),
            items,
            currency: CURRENCY.to_string(),
            client_name: customer.full_name(),
            client_email: customer.email.clone(),
            client_phone: customer.phone.clone(),
            webhook_url,
            success_url,
        }
    }
}

/// Allpay's answer to a payment-creation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Status value Allpay sends for a completed payment.
const STATUS_PAID: i64 = 1;

/// The fields of a payment notification the storefront acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub order_id: String,
    /// `status` as received, for logging.
    pub status: String,
    pub paid: bool,
}

impl Notification {
    /// Read a notification. Returns `None` without a usable `order_id`.
    #[must_use]
    pub fn from_payload(payload: &Map<String, Value>) -> Option<Self> {
        let order_id = match payload.get("order_id")? {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let status = payload.get("status").unwrap_or(&Value::Null);

        Some(Self {
            order_id,
            status: match status {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            paid: is_paid(status),
        })
    }
}

fn is_paid(status: &Value) -> bool {
    match status {
        Value::Number(n) => {
            n.as_i64() == Some(STATUS_PAID)
                || n.as_f64().is_some_and(|f| (f - 1.0).abs() < f64::EPSILON)
        }
        Value::String(s) => s.trim().parse::<i64>() == Ok(STATUS_PAID),
        _ => false,
    }
}
