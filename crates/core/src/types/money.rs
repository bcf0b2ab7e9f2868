//! Money helpers.
//!
//! Every amount in the storefront is an integer number of cents (`i64`). Any
//! step that multiplies by a fraction (tax, percentage discounts, dollar
//! conversion for the payment provider) goes through [`Decimal`] so rounding
//! is exact and reproducible.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Amount in the smallest currency unit (cents for USD).
pub type Cents = i64;

/// Multiply an amount by a decimal factor and round to whole cents.
///
/// Midpoints round away from zero, so `0.5` cent becomes `1`.
#[must_use]
pub fn mul_round(cents: Cents, factor: Decimal) -> Cents {
    (Decimal::from(cents) * factor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// `percent`% of an amount, rounded to whole cents.
#[must_use]
pub fn percent_of(cents: Cents, percent: i64) -> Cents {
    mul_round(cents, Decimal::new(percent, 2))
}

/// Convert cents to a dollar amount with two decimal places.
#[must_use]
pub fn to_dollars(cents: Cents) -> Decimal {
    Decimal::new(cents, 2)
}

/// Format cents for display, e.g. `1999` → `"$19.99"`.
#[must_use]
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}${:.2}", to_dollars(cents.abs()))
}
