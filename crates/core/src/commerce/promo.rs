//! Promo codes.
//!
//! The catalog is a static table. Validation is a pure function of the code,
//! the order subtotal and the current time; usage counters are read but never
//! incremented.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cents, format_cents, money};

/// How a promo code discounts an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// `value` is a whole percentage of the subtotal.
    Percentage,
    /// `value` is an amount in cents.
    Fixed,
}

/// A promo code rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: PromoKind,
    pub value: i64,
    pub min_order_amount: Option<Cents>,
    pub max_uses: Option<u32>,
    pub current_uses: u32,
    pub expires_at: Option<DateTime<Utc>>,
    pub applicable_categories: Option<Vec<String>>,
    pub is_active: bool,
    /// Waives shipping on top of any discount.
    pub free_shipping: bool,
}

/// Why a promo code was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoRejection {
    #[error("Invalid promo code")]
    Unknown,
    #[error("This promo code is no longer active")]
    Inactive,
    #[error("This promo code has expired")]
    Expired,
    #[error("This promo code has reached its usage limit")]
    UsageLimitReached,
    #[error("Minimum order of {} required", dollars(.minimum))]
    BelowMinimum { minimum: Cents },
}

fn dollars(cents: &Cents) -> String {
    format_cents(*cents)
}

/// A promo code accepted for a given subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromo {
    /// Canonical (catalog) spelling of the code.
    pub code: String,
    pub kind: PromoKind,
    pub discount: Cents,
    pub free_shipping: bool,
}

impl AppliedPromo {
    /// Customer-facing confirmation message.
    #[must_use]
    pub fn message(&self) -> String {
        format!("Promo applied! You save {}", format_cents(self.discount))
    }
}

impl PromoCode {
    /// Discount this code grants on `subtotal`, never more than the subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Cents) -> Cents {
        let raw = match self.kind {
            PromoKind::Percentage => money::percent_of(subtotal, self.value),
            PromoKind::Fixed => self.value,
        };
        raw.clamp(0, subtotal.max(0))
    }

    fn check(&self, subtotal: Cents, now: DateTime<Utc>) -> Result<(), PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if self.expires_at.is_some_and(|expires| expires < now) {
            return Err(PromoRejection::Expired);
        }
        if self
            .max_uses
            .is_some_and(|max| max > 0 && self.current_uses >= max)
        {
            return Err(PromoRejection::UsageLimitReached);
        }
        if let Some(minimum) = self.min_order_amount.filter(|m| *m > 0) {
            if subtotal < minimum {
                return Err(PromoRejection::BelowMinimum { minimum });
            }
        }
        Ok(())
    }
}

/// The promo code table.
#[derive(Debug, Clone)]
pub struct PromoCatalog {
    codes: Vec<PromoCode>,
}

impl PromoCatalog {
    #[must_use]
    pub const fn new(codes: Vec<PromoCode>) -> Self {
        Self { codes }
    }

    /// The codes the shop currently runs.
    #[must_use]
    pub fn builtin() -> Self {
        let vip_expiry = Utc
            .with_ymd_and_hms(2026, 12, 31, 23, 59, 59)
            .single();

        Self::new(vec![
            PromoCode {
                code: "WELCOME15".to_string(),
                kind: PromoKind::Percentage,
                value: 15,
                min_order_amount: Some(5_000),
                max_uses: Some(1_000),
                current_uses: 42,
                expires_at: None,
                applicable_categories: None,
                is_active: true,
                free_shipping: false,
            },
            PromoCode {
                code: "SPRING10".to_string(),
                kind: PromoKind::Fixed,
                value: 1_000,
                min_order_amount: Some(7_500),
                max_uses: None,
                current_uses: 0,
                expires_at: None,
                applicable_categories: None,
                is_active: true,
                free_shipping: false,
            },
            PromoCode {
                code: "FREESHIP".to_string(),
                kind: PromoKind::Fixed,
                value: 0,
                min_order_amount: None,
                max_uses: None,
                current_uses: 0,
                expires_at: None,
                applicable_categories: None,
                is_active: true,
                free_shipping: true,
            },
            PromoCode {
                code: "VIP25".to_string(),
                kind: PromoKind::Percentage,
                value: 25,
                min_order_amount: Some(15_000),
                max_uses: None,
                current_uses: 0,
                expires_at: vip_expiry,
                applicable_categories: None,
                is_active: true,
                free_shipping: false,
            },
        ])
    }

    /// Look up a code, ignoring case.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&PromoCode> {
        let code = code.trim();
        self.codes
            .iter()
            .find(|promo| promo.code.eq_ignore_ascii_case(code))
    }

    /// Validate `code` against an order subtotal at time `now`.
    ///
    /// # Errors
    ///
    /// Returns the first rule the code fails, checked in this order: unknown,
    /// inactive, expired, usage limit, minimum order amount.
    pub fn validate(
        &self,
        code: &str,
        subtotal: Cents,
        now: DateTime<Utc>,
    ) -> Result<AppliedPromo, PromoRejection> {
        let promo = self.find(code).ok_or(PromoRejection::Unknown)?;
        promo.check(subtotal, now)?;

        Ok(AppliedPromo {
            code: promo.code.clone(),
            kind: promo.kind,
            discount: promo.discount_for(subtotal),
            free_shipping: promo.free_shipping,
        })
    }
}

impl Default for PromoCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at(2026, 6, 1)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = PromoCatalog::builtin();
        let applied = catalog.validate("welcome15", 10_000, now()).unwrap();
        assert_eq!(applied.code, "WELCOME15");
        assert_eq!(applied.discount, 1_500);
        assert_eq!(applied.kind, PromoKind::Percentage);
    }

    #[test]
    fn test_lookup_ignores_surrounding_whitespace() {
        let catalog = PromoCatalog::builtin();
        assert_eq!(catalog.find("  welcome15\n").unwrap().code, "WELCOME15");
        assert!(catalog.validate(" WELCOME15 ", 10_000, now()).is_ok());
    }

    #[test]
    fn test_unknown_code() {
        let catalog = PromoCatalog::builtin();
        let err = catalog.validate("NOPE", 10_000, now()).unwrap_err();
        assert_eq!(err, PromoRejection::Unknown);
        assert_eq!(err.to_string(), "Invalid promo code");
    }

    #[test]
    fn test_below_minimum_message() {
        let catalog = PromoCatalog::builtin();
        let err = catalog.validate("SPRING10", 7_499, now()).unwrap_err();
        assert_eq!(err, PromoRejection::BelowMinimum { minimum: 7_500 });
        assert_eq!(err.to_string(), "Minimum order of $75.00 required");
    }

    #[test]
    fn test_fixed_discount() {
        let catalog = PromoCatalog::builtin();
        let applied = catalog.validate("SPRING10", 7_500, now()).unwrap();
        assert_eq!(applied.discount, 1_000);
        assert_eq!(applied.message(), "Promo applied! You save $10.00");
    }

    #[test]
    fn test_free_shipping_code() {
        let catalog = PromoCatalog::builtin();
        let applied = catalog.validate("FreeShip", 100, now()).unwrap();
        assert_eq!(applied.discount, 0);
        assert!(applied.free_shipping);
    }

    #[test]
    fn test_expiry() {
        let catalog = PromoCatalog::builtin();
        assert!(catalog.validate("VIP25", 20_000, at(2026, 12, 31)).is_ok());
        assert_eq!(
            catalog.validate("VIP25", 20_000, at(2027, 1, 1)).unwrap_err(),
            PromoRejection::Expired
        );
    }

    #[test]
    fn test_inactive_and_usage_limit() {
        let mut inactive = PromoCatalog::builtin().find("SPRING10").unwrap().clone();
        inactive.is_active = false;
        let mut exhausted = PromoCatalog::builtin().find("WELCOME15").unwrap().clone();
        exhausted.code = "USEDUP".to_string();
        exhausted.current_uses = 1_000;

        let catalog = PromoCatalog::new(vec![inactive, exhausted]);
        assert_eq!(
            catalog.validate("SPRING10", 10_000, now()).unwrap_err(),
            PromoRejection::Inactive
        );
        assert_eq!(
            catalog.validate("USEDUP", 10_000, now()).unwrap_err(),
            PromoRejection::UsageLimitReached
        );
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let big_fixed = PromoCode {
            code: "BIG".to_string(),
            kind: PromoKind::Fixed,
            value: 50_000,
            min_order_amount: None,
            max_uses: None,
            current_uses: 0,
            expires_at: None,
            applicable_categories: None,
            is_active: true,
            free_shipping: false,
        };
        let catalog = PromoCatalog::new(vec![big_fixed]);
        for subtotal in [0, 1, 999, 49_999, 50_000, 80_000] {
            let applied = catalog.validate("BIG", subtotal, now()).unwrap();
            assert!(applied.discount <= subtotal);
        }
    }

    #[test]
    fn test_valid_codes_follow_formula() {
        let catalog = PromoCatalog::builtin();
        for subtotal in [5_000, 7_500, 15_000, 33_333, 123_457] {
            for promo in &catalog.codes {
                if let Ok(applied) = catalog.validate(&promo.code, subtotal, now()) {
                    let expected = match promo.kind {
                        PromoKind::Percentage => money::percent_of(subtotal, promo.value),
                        PromoKind::Fixed => promo.value,
                    };
                    assert_eq!(applied.discount, expected, "{} @ {subtotal}", promo.code);
                    assert!(applied.discount <= subtotal);
                }
            }
        }
    }
}
