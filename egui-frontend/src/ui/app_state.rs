//! # App State Module
//!
//! Central state of the desktop client: the API handle, the rows last
//! confirmed by the server, and which dialogs are open.

use log::info;
use shared::{Invoice, Organization};

use crate::api::ApiClient;
use crate::ui::forms::{InvoiceForm, OrganizationForm};

/// Tabs available in the main interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTab {
    Organizations,
    Invoices,
}

/// Result of the start-up health check
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Checking,
    Connected,
    Failed(String),
}

/// Row waiting for the user to confirm deletion
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Organization { id: i64, name: String },
    Invoice { id: i64, number: String },
}

impl DeleteTarget {
    pub fn prompt(&self) -> String {
        match self {
            DeleteTarget::Organization { name, .. } => {
                format!("Delete organization '{}'? All of its invoices will be deleted too.", name)
            }
            DeleteTarget::Invoice { number, .. } => format!("Delete invoice '{}'?", number),
        }
    }
}

/// Main application struct for the invoice manager client
pub struct InvoiceManagerApp {
    pub api: ApiClient,
    pub connection: ConnectionState,
    pub current_tab: MainTab,

    // Data as last returned by the server
    pub organizations: Vec<Organization>,
    pub invoices: Vec<Invoice>,

    // Dialogs
    pub organization_form: Option<OrganizationForm>,
    pub invoice_form: Option<InvoiceForm>,
    pub pending_delete: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl InvoiceManagerApp {
    pub fn new(api: ApiClient) -> Self {
        info!("Initializing InvoiceManagerApp against {}", api.base_url());

        Self {
            api,
            connection: ConnectionState::Checking,
            current_tab: MainTab::Organizations,
            organizations: Vec::new(),
            invoices: Vec::new(),
            organization_form: None,
            invoice_form: None,
            pending_delete: None,
            error_message: None,
            success_message: None,
        }
    }

    pub fn organization_name(&self, organization_id: i64) -> Option<&str> {
        self.organizations
            .iter()
            .find(|organization| organization.id == organization_id)
            .map(|organization| organization.name.as_str())
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }
}
