//! # Data Loading Module
//!
//! Every server round-trip the UI makes. Local rows are replaced only with
//! what the server returns; a failed call leaves them untouched and opens the
//! error dialog instead.

use log::{info, warn};

use crate::api::ApiError;
use crate::ui::app_state::{ConnectionState, DeleteTarget, InvoiceManagerApp};
use crate::ui::forms::{InvoiceForm, OrganizationForm};

impl InvoiceManagerApp {
    /// Check server health, then load both lists
    pub fn load_initial_data(&mut self) {
        info!("Checking server health at {}", self.api.base_url());

        match self.api.health() {
            Ok(health) => {
                info!("Server is {}", health.status);
                self.connection = ConnectionState::Connected;
                self.refresh_all();
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                self.connection = ConnectionState::Failed(e.to_string());
            }
        }
    }

    pub fn refresh_all(&mut self) {
        self.refresh_organizations();
        self.refresh_invoices();
    }

    pub fn refresh_organizations(&mut self) {
        match self.api.list_organizations() {
            Ok(organizations) => {
                info!("Loaded {} organizations", organizations.len());
                self.organizations = organizations;
            }
            Err(e) => self.report_error("Failed to load organizations", e),
        }
    }

    pub fn refresh_invoices(&mut self) {
        match self.api.list_invoices() {
            Ok(invoices) => {
                info!("Loaded {} invoices", invoices.len());
                self.invoices = invoices;
            }
            Err(e) => self.report_error("Failed to load invoices", e),
        }
    }

    /// Load the current server copy of an organization into the edit dialog
    pub fn open_organization_editor(&mut self, id: i64) {
        match self.api.get_organization(id) {
            Ok(organization) => self.organization_form = Some(OrganizationForm::edit(&organization)),
            Err(e) => self.report_error("Failed to load organization", e),
        }
    }

    /// Load the current server copy of an invoice into the edit dialog
    pub fn open_invoice_editor(&mut self, id: i64) {
        match self.api.get_invoice(id) {
            Ok(invoice) => self.invoice_form = Some(InvoiceForm::edit(&invoice)),
            Err(e) => self.report_error("Failed to load invoice", e),
        }
    }

    /// Send the organization form. On failure the form stays open.
    pub fn save_organization(&mut self, form: OrganizationForm) {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(message) => {
                self.error_message = Some(message);
                self.organization_form = Some(form);
                return;
            }
        };

        let result = match form.editing_id {
            Some(id) => self.api.update_organization(id, &request),
            None => self.api.create_organization(&request),
        };

        match result {
            Ok(organization) => {
                info!("Saved organization {} ({})", organization.name, organization.id);
                self.success_message = Some(format!("Saved organization '{}'", organization.name));
                self.refresh_organizations();
                // Invoices show the organization name
                if form.editing_id.is_some() {
                    self.refresh_invoices();
                }
            }
            Err(e) => {
                self.report_error("Failed to save organization", e);
                self.organization_form = Some(form);
            }
        }
    }

    /// Send the invoice form. On failure the form stays open.
    pub fn save_invoice(&mut self, form: InvoiceForm) {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(message) => {
                self.error_message = Some(message);
                self.invoice_form = Some(form);
                return;
            }
        };

        let result = match form.editing_id {
            Some(id) => self.api.update_invoice(id, &request),
            None => self.api.create_invoice(&request),
        };

        match result {
            Ok(invoice) => {
                info!("Saved invoice {} total {}", invoice.invoice_number, invoice.total_amount);
                self.success_message = Some(format!(
                    "Saved invoice '{}' ({:.2})",
                    invoice.invoice_number, invoice.total_amount
                ));
                self.refresh_invoices();
            }
            Err(e) => {
                self.report_error("Failed to save invoice", e);
                self.invoice_form = Some(form);
            }
        }
    }

    pub fn delete_confirmed(&mut self, target: DeleteTarget) {
        match target {
            DeleteTarget::Organization { id, name } => match self.api.delete_organization(id) {
                Ok(response) => {
                    info!("Deleted organization {}: {}", id, response.message);
                    self.success_message = Some(format!("Deleted organization '{}'", name));
                    self.refresh_all();
                }
                Err(e) => self.report_error("Failed to delete organization", e),
            },
            DeleteTarget::Invoice { id, number } => match self.api.delete_invoice(id) {
                Ok(response) => {
                    info!("Deleted invoice {}: {}", id, response.message);
                    self.success_message = Some(format!("Deleted invoice '{}'", number));
                    self.refresh_invoices();
                }
                Err(e) => self.report_error("Failed to delete invoice", e),
            },
        }
    }

    fn report_error(&mut self, context: &str, error: ApiError) {
        warn!("{}: {}", context, error);
        self.success_message = None;
        self.error_message = Some(format!("{}: {}", context, error));
    }
}
