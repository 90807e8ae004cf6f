//! # Invoice Manager Backend
//!
//! REST service for organizations and their invoices. Layers:
//! - `storage`: SQLite repositories (sqlx)
//! - `domain`: validation, invoice totals and services
//! - `io::rest`: axum handlers
//!
//! `initialize_backend` wires them together; `create_router` builds the app.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod domain;
pub mod errors;
pub mod io;
pub mod storage;

use config::AppConfig;
use domain::{InvoiceService, OrganizationService};
use errors::AppResult;
use io::rest::{health_apis, invoice_apis, organization_apis};
use storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub organization_service: OrganizationService,
    pub invoice_service: InvoiceService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            organization_service: OrganizationService::new(db.clone()),
            invoice_service: InvoiceService::new(db),
        }
    }
}

/// Open the database and build the services
pub async fn initialize_backend(config: &AppConfig) -> AppResult<AppState> {
    info!("Initializing backend");

    let db = DbConnection::new(&config.database).await?;

    info!("Backend initialized");
    Ok(AppState::new(db))
}

/// Build the router. Collection routes answer with and without the trailing slash.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_apis::health_check))
        .route(
            "/organizations",
            get(organization_apis::list_organizations).post(organization_apis::create_organization),
        )
        .route(
            "/organizations/",
            get(organization_apis::list_organizations).post(organization_apis::create_organization),
        )
        .route(
            "/organizations/:id",
            get(organization_apis::get_organization)
                .put(organization_apis::update_organization)
                .delete(organization_apis::delete_organization),
        )
        .route(
            "/invoices",
            get(invoice_apis::list_invoices).post(invoice_apis::create_invoice),
        )
        .route(
            "/invoices/",
            get(invoice_apis::list_invoices).post(invoice_apis::create_invoice),
        )
        .route(
            "/invoices/:id",
            get(invoice_apis::get_invoice)
                .put(invoice_apis::update_invoice)
                .delete(invoice_apis::delete_invoice),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
