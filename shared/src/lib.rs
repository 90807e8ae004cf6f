use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod money;

/// A billed organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    /// Tax / fiscal registration code
    pub fiscal_code: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDate,
}

/// Body for creating or fully replacing an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub fiscal_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A line on an invoice. `total_price` is always derived by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: i64,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItemRequest {
    pub description: String,
    /// At most 2 fractional digits
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// At most 2 fractional digits
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// An invoice with its items and the name of the organization it bills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub organization_id: i64,
    pub organization_name: String,
    /// Globally unique invoice number
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Sum of the items' `total_price`
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDate,
    pub items: Vec<InvoiceItem>,
}

/// Body for creating an invoice or replacing an invoice and all of its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub organization_id: i64,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body returned for every non-2xx API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// One of `not_found`, `conflict`, `validation`, `storage`
    pub error: String,
    pub detail: String,
}

impl Invoice {
    /// Sum of the item totals as currently held in this DTO
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }
}
