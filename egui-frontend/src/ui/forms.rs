//! # Form State
//!
//! Editable state behind the organization and invoice dialogs. Inputs stay as
//! text while the user types and are turned into request DTOs on save. The
//! server validates again; checks here only catch obvious mistakes early.

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use shared::money::line_total;
use shared::{Invoice, InvoiceItemRequest, InvoiceRequest, Organization, OrganizationRequest};
use std::str::FromStr;

/// Organization create/edit dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationForm {
    /// `None` while creating
    pub editing_id: Option<i64>,
    pub name: String,
    pub fiscal_code: String,
    pub address: String,
}

impl OrganizationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(organization: &Organization) -> Self {
        Self {
            editing_id: Some(organization.id),
            name: organization.name.clone(),
            fiscal_code: organization.fiscal_code.clone().unwrap_or_default(),
            address: organization.address.clone().unwrap_or_default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.editing_id {
            Some(_) => "Edit Organization",
            None => "New Organization",
        }
    }

    pub fn to_request(&self) -> Result<OrganizationRequest, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }

        Ok(OrganizationRequest {
            name: name.to_string(),
            fiscal_code: optional(&self.fiscal_code),
            address: optional(&self.address),
        })
    }
}

/// One editable line item row
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
}

impl Default for ItemRow {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: "1".to_string(),
            unit_price: String::new(),
        }
    }
}

impl ItemRow {
    /// Row total with the server's rounding rule, if both numbers parse
    pub fn total(&self) -> Option<Decimal> {
        let quantity = parse_decimal(&self.quantity).ok()?;
        let unit_price = parse_decimal(&self.unit_price).ok()?;
        line_total(quantity, unit_price)
    }
}

/// Invoice create/edit dialog
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub editing_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: String,
    pub items: Vec<ItemRow>,
}

impl InvoiceForm {
    /// Blank invoice dated today, due in 30 days, with one empty row
    pub fn new(organization_id: Option<i64>) -> Self {
        let today = Local::now().date_naive();
        Self {
            editing_id: None,
            organization_id,
            invoice_number: String::new(),
            issue_date: today,
            due_date: today.checked_add_days(Days::new(30)).unwrap_or(today),
            notes: String::new(),
            items: vec![ItemRow::default()],
        }
    }

    pub fn edit(invoice: &Invoice) -> Self {
        Self {
            editing_id: Some(invoice.id),
            organization_id: Some(invoice.organization_id),
            invoice_number: invoice.invoice_number.clone(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            notes: invoice.notes.clone().unwrap_or_default(),
            items: invoice
                .items
                .iter()
                .map(|item| ItemRow {
                    description: item.description.clone(),
                    quantity: item.quantity.normalize().to_string(),
                    unit_price: format!("{:.2}", item.unit_price),
                })
                .collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.editing_id {
            Some(_) => "Edit Invoice",
            None => "New Invoice",
        }
    }

    pub fn add_item(&mut self) {
        self.items.push(ItemRow::default());
    }

    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Sum of the rows that currently parse
    pub fn running_total(&self) -> Decimal {
        self.items.iter().filter_map(ItemRow::total).sum()
    }

    pub fn to_request(&self) -> Result<InvoiceRequest, String> {
        let organization_id = self.organization_id.ok_or("Choose an organization")?;

        let invoice_number = self.invoice_number.trim();
        if invoice_number.is_empty() {
            return Err("Invoice number is required".to_string());
        }
        if self.items.is_empty() {
            return Err("Add at least one item".to_string());
        }

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let position = index + 1;
                let description = row.description.trim();
                if description.is_empty() {
                    return Err(format!("Item {}: description is required", position));
                }
                let quantity = parse_decimal(&row.quantity).map_err(|e| format!("Item {}: quantity {}", position, e))?;
                let unit_price =
                    parse_decimal(&row.unit_price).map_err(|e| format!("Item {}: unit price {}", position, e))?;
                Ok(InvoiceItemRequest {
                    description: description.to_string(),
                    quantity,
                    unit_price,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(InvoiceRequest {
            organization_id,
            invoice_number: invoice_number.to_string(),
            issue_date: self.issue_date,
            due_date: self.due_date,
            notes: optional(&self.notes),
            items,
        })
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("is required".to_string());
    }
    Decimal::from_str(text).map_err(|_| format!("'{}' is not a number", text))
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
