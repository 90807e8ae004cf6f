//! # Storage
//!
//! SQLite persistence. Amounts and quantities are kept as integer
//! hundredths and converted back to `Decimal` on read.

pub mod connection;
pub mod invoice_repository;
pub mod money;
pub mod organization_repository;

pub use connection::DbConnection;
pub use invoice_repository::{InvoiceItemRecord, InvoiceRecord, InvoiceRepository};
pub use organization_repository::OrganizationRepository;
