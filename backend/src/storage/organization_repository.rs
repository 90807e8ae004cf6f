use chrono::{NaiveDate, Utc};
use shared::{Organization, OrganizationRequest};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::errors::AppResult;
use crate::storage::connection::DbConnection;

/// Repository for organization rows
#[derive(Clone)]
pub struct OrganizationRepository {
    db: DbConnection,
}

impl OrganizationRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert an organization and return it with its generated id
    pub async fn store_organization(&self, request: &OrganizationRequest) -> AppResult<Organization> {
        let created_at = Utc::now().date_naive();

        let result = sqlx::query(
            r#"
            INSERT INTO organizations (name, fiscal_code, address, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&request.name)
        .bind(&request.fiscal_code)
        .bind(&request.address)
        .bind(created_at)
        .execute(self.db.pool())
        .await?;

        Ok(Organization {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            fiscal_code: request.fiscal_code.clone(),
            address: request.address.clone(),
            created_at,
        })
    }

    /// Get an organization by ID
    pub async fn get_organization(&self, organization_id: i64) -> AppResult<Option<Organization>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, fiscal_code, address, created_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(organization_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(map_organization).transpose()
    }

    /// List organizations ordered by id
    pub async fn list_organizations(&self, skip: u32, limit: u32) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, fiscal_code, address, created_at
            FROM organizations
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(map_organization).collect()
    }

    /// Replace every editable field. Returns false when no row matched.
    pub async fn update_organization(&self, organization_id: i64, request: &OrganizationRequest) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET name = ?, fiscal_code = ?, address = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.name)
        .bind(&request.fiscal_code)
        .bind(&request.address)
        .bind(organization_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an organization; invoices and their items go with it.
    /// Returns false when no row matched.
    pub async fn delete_organization(&self, organization_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(organization_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_organization(row: &SqliteRow) -> AppResult<Organization> {
    Ok(Organization {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        fiscal_code: row.try_get("fiscal_code")?,
        address: row.try_get("address")?,
        created_at: row.try_get::<NaiveDate, _>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> OrganizationRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        OrganizationRepository::new(db)
    }

    fn request(name: &str) -> OrganizationRequest {
        OrganizationRequest {
            name: name.to_string(),
            fiscal_code: Some("RO123".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_organization() {
        let repo = setup_test().await;

        let stored = repo.store_organization(&request("Acme")).await.expect("Failed to store");
        assert_eq!(stored.id, 1);

        let fetched = repo.get_organization(stored.id).await.expect("Failed to get");
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn test_get_missing_organization() {
        let repo = setup_test().await;

        let fetched = repo.get_organization(99).await.expect("Failed to query");
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_list_organizations_pagination() {
        let repo = setup_test().await;
        for name in ["First", "Second", "Third"] {
            repo.store_organization(&request(name)).await.expect("Failed to store");
        }

        let all = repo.list_organizations(0, 100).await.expect("Failed to list");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "First");

        let page = repo.list_organizations(1, 1).await.expect("Failed to list page");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Second");
    }

    #[tokio::test]
    async fn test_update_and_delete_organization() {
        let repo = setup_test().await;
        let stored = repo.store_organization(&request("Acme")).await.expect("Failed to store");

        let update = OrganizationRequest {
            name: "Acme Ltd".to_string(),
            fiscal_code: None,
            address: Some("1 Main St".to_string()),
        };
        assert!(repo.update_organization(stored.id, &update).await.expect("Failed to update"));

        let fetched = repo.get_organization(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Acme Ltd");
        assert!(fetched.fiscal_code.is_none());
        assert_eq!(fetched.address.as_deref(), Some("1 Main St"));
        assert_eq!(fetched.created_at, stored.created_at);

        assert!(repo.delete_organization(stored.id).await.expect("Failed to delete"));
        assert!(!repo.delete_organization(stored.id).await.expect("Failed to delete twice"));
        assert!(!repo.update_organization(stored.id, &update).await.expect("Failed to update missing"));
    }
}
