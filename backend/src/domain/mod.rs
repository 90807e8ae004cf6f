//! # Domain
//!
//! Validation and business rules. Services own the repositories and return
//! `AppResult` so the REST layer only has to pick a status code.

pub mod invoice_service;
pub mod invoice_totals;
pub mod organization_service;

pub use invoice_service::InvoiceService;
pub use invoice_totals::{compute_invoice_totals, ComputedLineItem, InvoiceTotals, LineItemInput};
pub use organization_service::OrganizationService;

/// Default and maximum page sizes for list operations
pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Resolve optional `skip`/`limit` query values into a bounded page
pub fn page_bounds(skip: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    (skip, limit)
}
