use shared::{Invoice, InvoiceRequest};
use tracing::{info, warn};

use crate::domain::invoice_totals::{compute_invoice_totals, LineItemInput};
use crate::domain::organization_service::optional_text;
use crate::domain::page_bounds;
use crate::errors::{AppError, AppResult};
use crate::storage::{DbConnection, InvoiceItemRecord, InvoiceRecord, InvoiceRepository};

/// Service for invoices and their line items
#[derive(Clone)]
pub struct InvoiceService {
    invoice_repository: InvoiceRepository,
}

impl InvoiceService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            invoice_repository: InvoiceRepository::new(db),
        }
    }

    /// Create an invoice with its items
    pub async fn create_invoice(&self, request: InvoiceRequest) -> AppResult<Invoice> {
        info!(
            "Creating invoice: number={}, organization_id={}, items={}",
            request.invoice_number,
            request.organization_id,
            request.items.len()
        );

        let invoice = self.apply_invoice_write(None, request).await?;

        info!("Created invoice {} with ID: {}, total={}", invoice.invoice_number, invoice.id, invoice.total_amount);
        Ok(invoice)
    }

    /// Replace an invoice's header and its whole item set
    pub async fn update_invoice(&self, invoice_id: i64, request: InvoiceRequest) -> AppResult<Invoice> {
        info!("Updating invoice: {} with {} items", invoice_id, request.items.len());

        let invoice = self.apply_invoice_write(Some(invoice_id), request).await?;

        info!("Updated invoice {}: total={}", invoice.id, invoice.total_amount);
        Ok(invoice)
    }

    pub async fn list_invoices(&self, skip: Option<u32>, limit: Option<u32>) -> AppResult<Vec<Invoice>> {
        let (skip, limit) = page_bounds(skip, limit);
        info!("Listing invoices: skip={}, limit={}", skip, limit);

        self.invoice_repository.list_invoices(skip, limit).await
    }

    pub async fn get_invoice(&self, invoice_id: i64) -> AppResult<Invoice> {
        info!("Getting invoice: {}", invoice_id);

        self.invoice_repository
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice", invoice_id))
    }

    /// Delete an invoice and its items
    pub async fn delete_invoice(&self, invoice_id: i64) -> AppResult<()> {
        info!("Deleting invoice: {}", invoice_id);

        if !self.invoice_repository.delete_invoice(invoice_id).await? {
            warn!("Invoice not found for deletion: {}", invoice_id);
            return Err(AppError::not_found("Invoice", invoice_id));
        }

        info!("Deleted invoice: {}", invoice_id);
        Ok(())
    }

    /// Validate, compute totals and write the invoice with its items atomically.
    /// The returned invoice is read back inside the same transaction.
    async fn apply_invoice_write(&self, invoice_id: Option<i64>, request: InvoiceRequest) -> AppResult<Invoice> {
        let invoice_number = request.invoice_number.trim();
        if invoice_number.is_empty() {
            return Err(AppError::validation("Invoice number cannot be empty"));
        }

        let inputs: Vec<LineItemInput> = request
            .items
            .into_iter()
            .map(|item| LineItemInput {
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();
        let totals = compute_invoice_totals(&inputs)?;

        let record = InvoiceRecord {
            organization_id: request.organization_id,
            invoice_number: invoice_number.to_string(),
            issue_date: request.issue_date,
            due_date: request.due_date,
            notes: optional_text(request.notes),
            total_amount: totals.grand_total,
            items: totals
                .items
                .into_iter()
                .map(|item| InvoiceItemRecord {
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                })
                .collect(),
        };

        match self.invoice_repository.write_invoice(invoice_id, &record).await {
            Ok(invoice) => Ok(invoice),
            Err(e) => {
                warn!("Invoice write rolled back: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::domain::OrganizationService;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{InvoiceItemRequest, OrganizationRequest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn setup_test() -> (InvoiceService, OrganizationService, i64) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let organizations = OrganizationService::new(db.clone());
        let acme = organizations
            .create_organization(OrganizationRequest {
                name: "Acme".to_string(),
                fiscal_code: None,
                address: None,
            })
            .await
            .expect("Failed to create organization");
        (InvoiceService::new(db), organizations, acme.id)
    }

    fn item(description: &str, quantity: &str, unit_price: &str) -> InvoiceItemRequest {
        InvoiceItemRequest {
            description: description.to_string(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
        }
    }

    fn invoice_request(organization_id: i64, number: &str, items: Vec<InvoiceItemRequest>) -> InvoiceRequest {
        InvoiceRequest {
            organization_id,
            invoice_number: number.to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            notes: None,
            items,
        }
    }

    #[tokio::test]
    async fn test_create_invoice_scenario() {
        let (service, _, acme) = setup_test().await;

        let invoice = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "2", "10.00"), item("B", "1", "5.00")]))
            .await
            .expect("Failed to create invoice");

        assert_eq!(invoice.organization_name, "Acme");
        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.total_amount, dec("25.00"));
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].total_price, dec("20.00"));
        assert_eq!(invoice.items[1].total_price, dec("5.00"));
        assert_eq!(invoice.total_amount, invoice.items_total());
    }

    #[tokio::test]
    async fn test_create_invoice_trims_header() {
        let (service, _, acme) = setup_test().await;
        let mut request = invoice_request(acme, "  INV-002 ", vec![item("A", "1", "1")]);
        request.notes = Some("   ".to_string());

        let invoice = service.create_invoice(request).await.unwrap();
        assert_eq!(invoice.invoice_number, "INV-002");
        assert!(invoice.notes.is_none());

        let blank = service.create_invoice(invoice_request(acme, "  ", vec![item("A", "1", "1")])).await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_validation_failure_touches_nothing() {
        let (service, _, acme) = setup_test().await;

        let result = service.create_invoice(invoice_request(acme, "INV-001", vec![])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1"), item("B", "0", "1")]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert!(service.list_invoices(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_organization_creates_nothing() {
        let (service, _, _) = setup_test().await;

        let result = service.create_invoice(invoice_request(999, "INV-001", vec![item("A", "1", "1")])).await;

        match result {
            Err(AppError::NotFound(message)) => assert_eq!(message, "Organization not found: 999"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(service.list_invoices(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_all_items() {
        let (service, _, acme) = setup_test().await;
        let created = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "2", "10.00"), item("B", "1", "5.00")]))
            .await
            .unwrap();

        let updated = service
            .update_invoice(created.id, invoice_request(acme, "INV-001", vec![item("C", "3", "9.99")]))
            .await
            .expect("Failed to update invoice");

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].description, "C");
        assert_eq!(updated.total_amount, dec("29.97"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let (service, _, acme) = setup_test().await;
        let created = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1")]))
            .await
            .unwrap();

        let request = invoice_request(acme, "INV-001", vec![item("X", "1.5", "3.33"), item("Y", "4", "0.25")]);
        let first = service.update_invoice(created.id, request.clone()).await.unwrap();
        let second = service.update_invoice(created.id, request).await.unwrap();

        assert_eq!(first.total_amount, second.total_amount);
        assert_eq!(first.total_amount, dec("6.00"));
        let describe = |invoice: &Invoice| {
            invoice
                .items
                .iter()
                .map(|i| (i.description.clone(), i.quantity, i.unit_price, i.total_price))
                .collect::<Vec<_>>()
        };
        assert_eq!(describe(&first), describe(&second));
    }

    #[tokio::test]
    async fn test_update_missing_invoice() {
        let (service, _, acme) = setup_test().await;

        let result = service.update_invoice(42, invoice_request(acme, "INV-001", vec![item("A", "1", "1")])).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_number_conflict_keeps_prior_state() {
        let (service, _, acme) = setup_test().await;
        service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1")]))
            .await
            .unwrap();
        let second = service
            .create_invoice(invoice_request(acme, "INV-002", vec![item("B", "2", "2")]))
            .await
            .unwrap();

        let duplicate = service.create_invoice(invoice_request(acme, "INV-001", vec![item("C", "1", "1")])).await;
        match duplicate {
            Err(AppError::Conflict(message)) => assert_eq!(message, "Invoice number already exists: INV-001"),
            other => panic!("expected Conflict, got {:?}", other),
        }

        let renamed = service
            .update_invoice(second.id, invoice_request(acme, "INV-001", vec![item("D", "9", "9")]))
            .await;
        assert!(matches!(renamed, Err(AppError::Conflict(_))));

        let unchanged = service.get_invoice(second.id).await.unwrap();
        assert_eq!(unchanged, second);
        assert_eq!(service.list_invoices(None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_can_move_invoice_between_organizations() {
        let (service, organizations, acme) = setup_test().await;
        let globex = organizations
            .create_organization(OrganizationRequest {
                name: "Globex".to_string(),
                fiscal_code: None,
                address: None,
            })
            .await
            .unwrap();
        let created = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1")]))
            .await
            .unwrap();

        let moved = service
            .update_invoice(created.id, invoice_request(globex.id, "INV-001", vec![item("A", "1", "1")]))
            .await
            .unwrap();
        assert_eq!(moved.organization_name, "Globex");

        let missing_org = service
            .update_invoice(created.id, invoice_request(999, "INV-001", vec![item("Z", "1", "1")]))
            .await;
        assert!(matches!(missing_org, Err(AppError::NotFound(_))));
        assert_eq!(service.get_invoice(created.id).await.unwrap(), moved);
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let (service, _, acme) = setup_test().await;
        let created = service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1")]))
            .await
            .unwrap();

        service.delete_invoice(created.id).await.expect("Failed to delete invoice");

        assert!(matches!(service.get_invoice(created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_invoice(created.id).await, Err(AppError::NotFound(_))));

        // The number is free again
        assert!(service
            .create_invoice(invoice_request(acme, "INV-001", vec![item("A", "1", "1")]))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_invoices_nested_items() {
        let (service, _, acme) = setup_test().await;
        for number in ["INV-001", "INV-002", "INV-003"] {
            service
                .create_invoice(invoice_request(acme, number, vec![item("A", "1", "1"), item("B", "2", "2.50")]))
                .await
                .unwrap();
        }

        let invoices = service.list_invoices(None, Some(2)).await.unwrap();
        assert_eq!(invoices.len(), 2);
        for invoice in &invoices {
            assert_eq!(invoice.items.len(), 2);
            assert_eq!(invoice.total_amount, dec("6.00"));
            assert_eq!(invoice.organization_name, "Acme");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_creates_on_file_database() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("invoices.db").display()),
            max_connections: 5,
        };
        let db = DbConnection::new(&config).await.expect("Failed to open database");
        let acme = OrganizationService::new(db.clone())
            .create_organization(OrganizationRequest {
                name: "Acme".to_string(),
                fiscal_code: None,
                address: None,
            })
            .await
            .unwrap();
        let service = InvoiceService::new(db);

        let handles: Vec<_> = (0..40)
            .map(|n| {
                let service = service.clone();
                let request = invoice_request(acme.id, &format!("INV-{:03}", n), vec![item("A", "2", "1.25")]);
                tokio::spawn(async move { service.create_invoice(request).await })
            })
            .collect();

        for handle in handles {
            let invoice = handle.await.expect("Task panicked").expect("Concurrent create failed");
            assert_eq!(invoice.total_amount, dec("2.50"));
        }

        let invoices = service.list_invoices(None, None).await.unwrap();
        assert_eq!(invoices.len(), 40);
        assert!(invoices.iter().all(|invoice| invoice.items.len() == 1));
    }
}
