//! # UI
//!
//! egui front end. `InvoiceManagerApp` is split across files by concern:
//! state, server calls, the two tabs and the dialogs.

pub mod app_coordinator;
pub mod app_state;
pub mod data_loading;
pub mod forms;
pub mod invoice_view;
pub mod modals;
pub mod organization_view;

pub use app_state::InvoiceManagerApp;

/// What a dialog asked for during this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Editing,
    Save,
    Cancel,
}
