//! Pricing commands: order quotes and promo checks.
//!
//! Both run the same rules the storefront applies at checkout, against the
//! bundled promo and shipping tables.

use std::path::Path;

use chrono::{DateTime, Utc};
use guzel_core::commerce::{
    AppliedPromo, CartItem, OrderSummary, PromoCatalog, PromoRejection, builtin_methods,
    cart::subtotal, find_method,
};
use guzel_core::types::Cents;

use super::{CliError, read_file};

/// Price a JSON array of cart items.
///
/// An unusable promo code is reported and ignored, as at checkout.
///
/// # Errors
///
/// Returns an error if the file is unreadable, the items do not parse, or the
/// shipping method is unknown.
pub async fn quote(
    path: &Path,
    shipping: &str,
    promo: Option<&str>,
) -> Result<OrderSummary, CliError> {
    let items: Vec<CartItem> = serde_json::from_str(&read_file(path).await?)?;
    quote_items(&items, shipping, promo, Utc::now())
}

fn quote_items(
    items: &[CartItem],
    shipping: &str,
    promo: Option<&str>,
    now: DateTime<Utc>,
) -> Result<OrderSummary, CliError> {
    let methods = builtin_methods();
    let method = find_method(&methods, shipping)
        .ok_or_else(|| CliError::UnknownShippingMethod(shipping.to_string()))?;

    let applied = promo.and_then(|code| {
        match PromoCatalog::builtin().validate(code, subtotal(items), now) {
            Ok(applied) => Some(applied),
            Err(rejection) => {
                tracing::warn!(code, %rejection, "Promo code ignored");
                None
            }
        }
    });

    Ok(OrderSummary::compute(items, method, applied.as_ref()))
}

/// Validate a promo code against a subtotal in cents.
///
/// # Errors
///
/// Returns the rule the code fails.
pub fn promo(code: &str, subtotal: Cents) -> Result<AppliedPromo, PromoRejection> {
    PromoCatalog::builtin().validate(code, subtotal, Utc::now())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use guzel_core::ColorOption;
    use guzel_core::types::ProductId;

    use super::*;

    fn items() -> Vec<CartItem> {
        vec![CartItem {
            product_id: ProductId::new("14"),
            slug: "tailored-wool-coat".to_string(),
            name: "Tailored Wool Coat".to_string(),
            price: 39_500,
            original_price: None,
            image: String::new(),
            color: ColorOption {
                name: "Black".to_string(),
                hex: "#1A1A1A".to_string(),
            },
            size: "M".to_string(),
            quantity: 1,
        }]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_quote_with_promo() {
        let summary = quote_items(&items(), "standard", Some("welcome15"), now()).unwrap();
        assert_eq!(summary.subtotal, 39_500);
        assert_eq!(summary.discount, 5_925);
        // Above the standard free-shipping threshold
        assert_eq!(summary.shipping, 0);
        assert_eq!(
            summary.total,
            summary.subtotal - summary.discount + summary.shipping + summary.tax
        );
        assert_eq!(summary.promo_code.as_deref(), Some("WELCOME15"));
    }

    #[test]
    fn test_quote_ignores_bad_promo() {
        let summary = quote_items(&items(), "standard", Some("NOPE"), now()).unwrap();
        assert_eq!(summary.discount, 0);
        assert!(summary.promo_code.is_none());
    }

    #[test]
    fn test_quote_unknown_shipping() {
        assert!(matches!(
            quote_items(&items(), "teleport", None, now()),
            Err(CliError::UnknownShippingMethod(_))
        ));
    }

    #[test]
    fn test_promo_rejection() {
        assert_eq!(
            promo("SPRING10", 100).unwrap_err(),
            PromoRejection::BelowMinimum { minimum: 7_500 }
        );
    }
}
