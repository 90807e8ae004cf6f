use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{InvoiceRequest, MessageResponse};
use tracing::{error, info};

use crate::io::rest::{ApiJson, ApiPath, ApiQuery, ListQuery};
use crate::AppState;

/// Axum handler function for POST /invoices/
pub async fn create_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<InvoiceRequest>,
) -> impl IntoResponse {
    info!(
        "POST /invoices - number: {}, organization: {}",
        request.invoice_number, request.organization_id
    );

    match state.invoice_service.create_invoice(request).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => {
            error!("Error creating invoice: {}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for GET /invoices/
pub async fn list_invoices(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> impl IntoResponse {
    info!("GET /invoices - query: {:?}", query);

    match state.invoice_service.list_invoices(query.skip, query.limit).await {
        Ok(invoices) => (StatusCode::OK, Json(invoices)).into_response(),
        Err(e) => {
            error!("Error listing invoices: {}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for GET /invoices/:id
pub async fn get_invoice(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> impl IntoResponse {
    info!("GET /invoices/{}", id);

    match state.invoice_service.get_invoice(id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => {
            error!("Error getting invoice {}: {}", id, e);
            e.into_response()
        }
    }
}

/// Axum handler function for PUT /invoices/:id
pub async fn update_invoice(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<InvoiceRequest>,
) -> impl IntoResponse {
    info!("PUT /invoices/{} - number: {}", id, request.invoice_number);

    match state.invoice_service.update_invoice(id, request).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => {
            error!("Error updating invoice {}: {}", id, e);
            e.into_response()
        }
    }
}

/// Axum handler function for DELETE /invoices/:id
pub async fn delete_invoice(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> impl IntoResponse {
    info!("DELETE /invoices/{}", id);

    match state.invoice_service.delete_invoice(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Invoice deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting invoice {}: {}", id, e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::read_json;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{ErrorResponse, Invoice, InvoiceItemRequest, OrganizationRequest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn setup_test_handlers() -> (AppState, i64) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let state = AppState::new(db);
        let acme = state
            .organization_service
            .create_organization(OrganizationRequest {
                name: "Acme".to_string(),
                fiscal_code: None,
                address: None,
            })
            .await
            .expect("Failed to create organization");
        (state, acme.id)
    }

    fn invoice_request(organization_id: i64, number: &str, items: &[(&str, &str, &str)]) -> InvoiceRequest {
        InvoiceRequest {
            organization_id,
            invoice_number: number.to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            notes: Some("Net 30".to_string()),
            items: items
                .iter()
                .map(|(description, quantity, unit_price)| InvoiceItemRequest {
                    description: description.to_string(),
                    quantity: dec(quantity),
                    unit_price: dec(unit_price),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_invoice_returns_computed_totals() {
        let (state, acme) = setup_test_handlers().await;

        let request = invoice_request(acme, "INV-001", &[("A", "2", "10.00"), ("B", "1", "5.00")]);
        let response = create_invoice(State(state), ApiJson(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let invoice: Invoice = read_json(response).await;
        assert_eq!(invoice.total_amount, dec("25.00"));
        assert_eq!(invoice.organization_name, "Acme");
        assert_eq!(invoice.notes.as_deref(), Some("Net 30"));
    }

    #[tokio::test]
    async fn test_create_invoice_error_statuses() {
        let (state, acme) = setup_test_handlers().await;

        let missing_org = invoice_request(999, "INV-001", &[("A", "1", "1")]);
        let response = create_invoice(State(state.clone()), ApiJson(missing_org)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = create_invoice(State(state.clone()), ApiJson(invoice_request(acme, "INV-001", &[])))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        create_invoice(State(state.clone()), ApiJson(invoice_request(acme, "INV-001", &[("A", "1", "1")]))).await;
        let response = create_invoice(State(state), ApiJson(invoice_request(acme, "INV-001", &[("A", "1", "1")])))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.error, "conflict");
        assert_eq!(body.detail, "Invoice number already exists: INV-001");
    }

    #[tokio::test]
    async fn test_update_list_and_delete_invoice() {
        let (state, acme) = setup_test_handlers().await;
        let created: Invoice = read_json(
            create_invoice(State(state.clone()), ApiJson(invoice_request(acme, "INV-001", &[("A", "1", "1")])))
                .await
                .into_response(),
        )
        .await;

        let response = update_invoice(
            State(state.clone()),
            ApiPath(created.id),
            ApiJson(invoice_request(acme, "INV-001", &[("Widget", "3", "9.99")])),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Invoice = read_json(response).await;
        assert_eq!(updated.total_amount, dec("29.97"));

        let response = list_invoices(State(state.clone()), ApiQuery(ListQuery::default())).await.into_response();
        let invoices: Vec<Invoice> = read_json(response).await;
        assert_eq!(invoices, vec![updated]);

        let response = delete_invoice(State(state.clone()), ApiPath(created.id)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let message: MessageResponse = read_json(response).await;
        assert_eq!(message.message, "Invoice deleted successfully");

        let response = get_invoice(State(state.clone()), ApiPath(created.id)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = update_invoice(
            State(state),
            ApiPath(created.id),
            ApiJson(invoice_request(acme, "INV-001", &[("A", "1", "1")])),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
