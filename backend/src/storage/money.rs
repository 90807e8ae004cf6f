//! Conversions between `Decimal` and the integer hundredths kept in SQLite.

use rust_decimal::Decimal;
use shared::money::{round_money, MONEY_SCALE};

use crate::errors::{AppError, AppResult};

/// Decimal -> hundredths. Values are rounded to two digits first.
pub fn to_minor_units(value: Decimal) -> AppResult<i64> {
    let rounded = round_money(value);
    i64::try_from(rounded.mantissa())
        .map_err(|_| AppError::validation(format!("Amount {} is too large to store", value)))
}

/// Hundredths -> Decimal with a scale of two
pub fn from_minor_units(units: i64) -> Decimal {
    Decimal::new(units, MONEY_SCALE)
}
