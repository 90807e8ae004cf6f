use shared::{Organization, OrganizationRequest};
use tracing::{info, warn};

use crate::domain::page_bounds;
use crate::errors::{AppError, AppResult};
use crate::storage::{DbConnection, OrganizationRepository};

const MAX_NAME_LENGTH: usize = 255;

/// Service for managing the organizations invoices are billed to
#[derive(Clone)]
pub struct OrganizationService {
    organization_repository: OrganizationRepository,
}

impl OrganizationService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            organization_repository: OrganizationRepository::new(db),
        }
    }

    /// Create a new organization
    pub async fn create_organization(&self, request: OrganizationRequest) -> AppResult<Organization> {
        info!("Creating organization: name={}", request.name);

        let request = normalize_request(request)?;
        let organization = self.organization_repository.store_organization(&request).await?;

        info!("Created organization: {} with ID: {}", organization.name, organization.id);
        Ok(organization)
    }

    /// List organizations ordered by id
    pub async fn list_organizations(&self, skip: Option<u32>, limit: Option<u32>) -> AppResult<Vec<Organization>> {
        let (skip, limit) = page_bounds(skip, limit);
        info!("Listing organizations: skip={}, limit={}", skip, limit);

        self.organization_repository.list_organizations(skip, limit).await
    }

    pub async fn get_organization(&self, organization_id: i64) -> AppResult<Organization> {
        info!("Getting organization: {}", organization_id);

        self.organization_repository
            .get_organization(organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization", organization_id))
    }

    /// Replace every editable field of an organization
    pub async fn update_organization(
        &self,
        organization_id: i64,
        request: OrganizationRequest,
    ) -> AppResult<Organization> {
        info!("Updating organization: {}", organization_id);

        let request = normalize_request(request)?;
        if !self.organization_repository.update_organization(organization_id, &request).await? {
            warn!("Organization not found for update: {}", organization_id);
            return Err(AppError::not_found("Organization", organization_id));
        }

        self.get_organization(organization_id).await
    }

    /// Delete an organization together with its invoices and their items
    pub async fn delete_organization(&self, organization_id: i64) -> AppResult<()> {
        info!("Deleting organization: {}", organization_id);

        if !self.organization_repository.delete_organization(organization_id).await? {
            warn!("Organization not found for deletion: {}", organization_id);
            return Err(AppError::not_found("Organization", organization_id));
        }

        info!("Deleted organization: {}", organization_id);
        Ok(())
    }
}

fn normalize_request(request: OrganizationRequest) -> AppResult<OrganizationRequest> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Organization name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Organization name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }

    Ok(OrganizationRequest {
        name: name.to_string(),
        fiscal_code: optional_text(request.fiscal_code),
        address: optional_text(request.address),
    })
}

/// Trimmed text, with blank values collapsed to `None`
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvoiceService;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{InvoiceItemRequest, InvoiceRequest};

    async fn setup_test() -> (OrganizationService, InvoiceService) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (OrganizationService::new(db.clone()), InvoiceService::new(db))
    }

    fn request(name: &str) -> OrganizationRequest {
        OrganizationRequest {
            name: name.to_string(),
            fiscal_code: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_organization() {
        let (service, _) = setup_test().await;

        let organization = service
            .create_organization(OrganizationRequest {
                name: "  Acme  ".to_string(),
                fiscal_code: Some(" RO123 ".to_string()),
                address: Some("   ".to_string()),
            })
            .await
            .expect("Failed to create organization");

        assert_eq!(organization.name, "Acme");
        assert_eq!(organization.fiscal_code.as_deref(), Some("RO123"));
        assert!(organization.address.is_none());
    }

    #[tokio::test]
    async fn test_create_organization_validation() {
        let (service, _) = setup_test().await;

        let result = service.create_organization(request("   ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.create_organization(request(&"x".repeat(256))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.create_organization(request(&"x".repeat(255))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_organization() {
        let (service, _) = setup_test().await;

        let result = service.get_organization(7).await;
        match result {
            Err(AppError::NotFound(message)) => assert_eq!(message, "Organization not found: 7"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_organizations_defaults() {
        let (service, _) = setup_test().await;
        for name in ["One", "Two", "Three"] {
            service.create_organization(request(name)).await.unwrap();
        }

        let all = service.list_organizations(None, None).await.unwrap();
        assert_eq!(all.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(), ["One", "Two", "Three"]);

        let page = service.list_organizations(Some(2), Some(0)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Three");
    }

    #[tokio::test]
    async fn test_update_organization() {
        let (service, _) = setup_test().await;
        let created = service.create_organization(request("Acme")).await.unwrap();

        let updated = service
            .update_organization(
                created.id,
                OrganizationRequest {
                    name: "Acme Ltd".to_string(),
                    fiscal_code: Some("RO999".to_string()),
                    address: None,
                },
            )
            .await
            .expect("Failed to update organization");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Acme Ltd");
        assert_eq!(updated.fiscal_code.as_deref(), Some("RO999"));

        let missing = service.update_organization(999, request("Nobody")).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let invalid = service.update_organization(created.id, request("")).await;
        assert!(matches!(invalid, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_organization_cascades_invoices() {
        let (organizations, invoices) = setup_test().await;
        let organization = organizations.create_organization(request("Acme")).await.unwrap();

        let invoice = invoices
            .create_invoice(InvoiceRequest {
                organization_id: organization.id,
                invoice_number: "INV-001".to_string(),
                issue_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
                notes: None,
                items: vec![InvoiceItemRequest {
                    description: "Widget".to_string(),
                    quantity: Decimal::from(1),
                    unit_price: Decimal::from(10),
                }],
            })
            .await
            .expect("Failed to create invoice");

        organizations.delete_organization(organization.id).await.expect("Failed to delete");

        assert!(matches!(invoices.get_invoice(invoice.id).await, Err(AppError::NotFound(_))));
        assert!(invoices.list_invoices(None, None).await.unwrap().is_empty());
        assert!(matches!(
            organizations.delete_organization(organization.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
