//! Sales tax.

use rust_decimal::Decimal;

use crate::types::{Cents, money};

/// Flat sales tax rate (8.875%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8875, 0, 0, false, 5);

/// Tax on a taxable amount, rounded to whole cents. Negative amounts are
/// taxed as zero.
#[must_use]
pub fn calculate_tax(taxable: Cents) -> Cents {
    money::mul_round(taxable.max(0), TAX_RATE)
}
