use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{Invoice, InvoiceItem};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::storage::connection::DbConnection;
use crate::storage::money::{from_minor_units, to_minor_units};

/// Everything written for one invoice, totals already computed
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub organization_id: i64,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub total_amount: Decimal,
    pub items: Vec<InvoiceItemRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItemRecord {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Repository for invoices and their items
#[derive(Clone)]
pub struct InvoiceRepository {
    db: DbConnection,
}

impl InvoiceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert (`invoice_id == None`) or replace an invoice together with its
    /// whole item set in one transaction, and return it as stored.
    ///
    /// The invoice row is written first so the transaction holds the write
    /// lock before it reads anything. Nothing is committed unless every
    /// statement succeeds; returning early drops the transaction, which rolls
    /// it back.
    pub async fn write_invoice(&self, invoice_id: Option<i64>, record: &InvoiceRecord) -> AppResult<Invoice> {
        let total_amount_cents = to_minor_units(record.total_amount)?;
        let today = Utc::now().date_naive();

        let mut tx = self.db.pool().begin().await?;

        let id = match invoice_id {
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE invoices
                    SET organization_id = ?, invoice_number = ?, issue_date = ?,
                        due_date = ?, total_amount_cents = ?, notes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(record.organization_id)
                .bind(&record.invoice_number)
                .bind(record.issue_date)
                .bind(record.due_date)
                .bind(total_amount_cents)
                .bind(&record.notes)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| invoice_write_error(e, record))?;

                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("Invoice", id));
                }

                sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO invoices (organization_id, invoice_number, issue_date,
                        due_date, total_amount_cents, notes, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.organization_id)
                .bind(&record.invoice_number)
                .bind(record.issue_date)
                .bind(record.due_date)
                .bind(total_amount_cents)
                .bind(&record.notes)
                .bind(today)
                .execute(&mut *tx)
                .await
                .map_err(|e| invoice_write_error(e, record))?;

                result.last_insert_rowid()
            }
        };

        for item in &record.items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, description, quantity_hundredths,
                    unit_price_cents, total_price_cents, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(&item.description)
            .bind(to_minor_units(item.quantity)?)
            .bind(to_minor_units(item.unit_price)?)
            .bind(to_minor_units(item.total_price)?)
            .bind(today)
            .execute(&mut *tx)
            .await?;
        }

        let invoice = read_invoice(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice", id))?;

        tx.commit().await?;

        Ok(invoice)
    }

    /// Get an invoice with its items and organization name
    pub async fn get_invoice(&self, invoice_id: i64) -> AppResult<Option<Invoice>> {
        // Header and items are read in one transaction so they agree
        let mut tx = self.db.pool().begin().await?;
        let invoice = read_invoice(&mut tx, invoice_id).await?;
        tx.commit().await?;

        Ok(invoice)
    }

    /// List invoices ordered by id, each with its items and organization name
    pub async fn list_invoices(&self, skip: u32, limit: u32) -> AppResult<Vec<Invoice>> {
        let mut tx = self.db.pool().begin().await?;

        let rows = sqlx::query(
            r#"
            SELECT i.id, i.organization_id, o.name AS organization_name, i.invoice_number,
                   i.issue_date, i.due_date, i.total_amount_cents, i.notes, i.created_at
            FROM invoices i
            JOIN organizations o ON o.id = i.organization_id
            ORDER BY i.id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&mut *tx)
        .await?;

        let mut invoices = rows.iter().map(map_invoice).collect::<AppResult<Vec<_>>>()?;
        let ids: Vec<i64> = invoices.iter().map(|invoice| invoice.id).collect();
        let mut items = load_items(&mut tx, &ids).await?;

        tx.commit().await?;

        for invoice in &mut invoices {
            invoice.items = items.remove(&invoice.id).unwrap_or_default();
        }

        Ok(invoices)
    }

    /// Delete an invoice and its items. Returns false when no row matched.
    pub async fn delete_invoice(&self, invoice_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(invoice_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// One invoice header plus its items, read on the caller's transaction
async fn read_invoice(tx: &mut Transaction<'_, Sqlite>, invoice_id: i64) -> AppResult<Option<Invoice>> {
    let row = sqlx::query(
        r#"
        SELECT i.id, i.organization_id, o.name AS organization_name, i.invoice_number,
               i.issue_date, i.due_date, i.total_amount_cents, i.notes, i.created_at
        FROM invoices i
        JOIN organizations o ON o.id = i.organization_id
        WHERE i.id = ?
        "#,
    )
    .bind(invoice_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut invoice = map_invoice(&row)?;
    let mut items = load_items(tx, &[invoice_id]).await?;
    invoice.items = items.remove(&invoice_id).unwrap_or_default();

    Ok(Some(invoice))
}

/// Items for the given invoices, grouped by invoice id, each group ordered by item id
async fn load_items(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_ids: &[i64],
) -> AppResult<HashMap<i64, Vec<InvoiceItem>>> {
    let mut grouped: HashMap<i64, Vec<InvoiceItem>> = HashMap::new();
    if invoice_ids.is_empty() {
        return Ok(grouped);
    }

    let placeholders = vec!["?"; invoice_ids.len()].join(", ");
    let sql = format!(
        "SELECT id, invoice_id, description, quantity_hundredths, unit_price_cents, total_price_cents \
         FROM invoice_items WHERE invoice_id IN ({}) ORDER BY id ASC",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in invoice_ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(&mut **tx).await?;

    for row in &rows {
        let invoice_id: i64 = row.try_get("invoice_id")?;
        grouped.entry(invoice_id).or_default().push(InvoiceItem {
            id: row.try_get("id")?,
            description: row.try_get("description")?,
            quantity: from_minor_units(row.try_get("quantity_hundredths")?),
            unit_price: from_minor_units(row.try_get("unit_price_cents")?),
            total_price: from_minor_units(row.try_get("total_price_cents")?),
        });
    }

    Ok(grouped)
}

fn map_invoice(row: &SqliteRow) -> AppResult<Invoice> {
    Ok(Invoice {
        id: row.try_get("id")?,
        organization_id: row.try_get("organization_id")?,
        organization_name: row.try_get("organization_name")?,
        invoice_number: row.try_get("invoice_number")?,
        issue_date: row.try_get("issue_date")?,
        due_date: row.try_get("due_date")?,
        total_amount: from_minor_units(row.try_get("total_amount_cents")?),
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        items: Vec::new(),
    })
}

/// Unique violations name the invoice number; FK violations mean the organization is gone
fn invoice_write_error(err: sqlx::Error, record: &InvoiceRecord) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => {
            AppError::Conflict(format!("Invoice number already exists: {}", record.invoice_number))
        }
        AppError::NotFound(_) => AppError::not_found("Organization", record.organization_id),
        other => other,
    }
}
