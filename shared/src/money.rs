//! Fixed-point money helpers shared by the server and the desktop client.
//!
//! Amounts and quantities carry exactly two fractional digits. Products are
//! rounded half-up (away from zero) back to two digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every amount and quantity
pub const MONEY_SCALE: u32 = 2;

/// Round to two fractional digits, half-up, and pin the scale to two.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// `quantity * unit_price` rounded to two digits. `None` on overflow.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price).map(round_money)
}

/// True when the value needs no more than two fractional digits.
pub fn fits_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}
