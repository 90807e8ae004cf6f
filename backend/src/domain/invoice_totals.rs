//! # Invoice Totals
//!
//! Computes each line item's total and the invoice grand total with exact
//! decimal arithmetic. Item totals are rounded half-up to two digits and the
//! grand total is the sum of those rounded values, so the stored invoice total
//! always equals the sum of its stored items.

use rust_decimal::Decimal;
use shared::money::{fits_money_scale, line_total};

use crate::errors::{AppError, AppResult};

/// One candidate line item as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedLineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    /// Same order as the input
    pub items: Vec<ComputedLineItem>,
    pub grand_total: Decimal,
}

/// Validate the item set and compute item totals plus the grand total.
pub fn compute_invoice_totals(items: &[LineItemInput]) -> AppResult<InvoiceTotals> {
    if items.is_empty() {
        return Err(AppError::validation("An invoice needs at least one item"));
    }

    let mut computed = Vec::with_capacity(items.len());
    let mut grand_total = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        let description = item.description.trim();

        if description.is_empty() {
            return Err(AppError::validation(format!("Item {}: description is required", position)));
        }
        if item.quantity <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Item {}: quantity must be greater than zero, got {}",
                position, item.quantity
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Item {}: unit price cannot be negative, got {}",
                position, item.unit_price
            )));
        }
        if !fits_money_scale(item.quantity) {
            return Err(AppError::validation(format!(
                "Item {}: quantity {} has more than two decimal places",
                position, item.quantity
            )));
        }
        if !fits_money_scale(item.unit_price) {
            return Err(AppError::validation(format!(
                "Item {}: unit price {} has more than two decimal places",
                position, item.unit_price
            )));
        }

        let total_price = line_total(item.quantity, item.unit_price)
            .ok_or_else(|| AppError::validation(format!("Item {}: total is too large", position)))?;
        grand_total = grand_total
            .checked_add(total_price)
            .ok_or_else(|| AppError::validation("Invoice total is too large"))?;

        computed.push(ComputedLineItem {
            description: description.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price,
        });
    }

    Ok(InvoiceTotals {
        items: computed,
        grand_total,
    })
}
