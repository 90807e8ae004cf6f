use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{MessageResponse, OrganizationRequest};
use tracing::{error, info};

use crate::io::rest::{ApiJson, ApiPath, ApiQuery, ListQuery};
use crate::AppState;

/// Axum handler function for POST /organizations/
pub async fn create_organization(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OrganizationRequest>,
) -> impl IntoResponse {
    info!("POST /organizations - name: {}", request.name);

    match state.organization_service.create_organization(request).await {
        Ok(organization) => (StatusCode::CREATED, Json(organization)).into_response(),
        Err(e) => {
            error!("Error creating organization: {}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for GET /organizations/
pub async fn list_organizations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> impl IntoResponse {
    info!("GET /organizations - query: {:?}", query);

    match state.organization_service.list_organizations(query.skip, query.limit).await {
        Ok(organizations) => (StatusCode::OK, Json(organizations)).into_response(),
        Err(e) => {
            error!("Error listing organizations: {}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for GET /organizations/:id
pub async fn get_organization(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> impl IntoResponse {
    info!("GET /organizations/{}", id);

    match state.organization_service.get_organization(id).await {
        Ok(organization) => (StatusCode::OK, Json(organization)).into_response(),
        Err(e) => {
            error!("Error getting organization {}: {}", id, e);
            e.into_response()
        }
    }
}

/// Axum handler function for PUT /organizations/:id
pub async fn update_organization(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<OrganizationRequest>,
) -> impl IntoResponse {
    info!("PUT /organizations/{} - name: {}", id, request.name);

    match state.organization_service.update_organization(id, request).await {
        Ok(organization) => (StatusCode::OK, Json(organization)).into_response(),
        Err(e) => {
            error!("Error updating organization {}: {}", id, e);
            e.into_response()
        }
    }
}

/// Axum handler function for DELETE /organizations/:id
pub async fn delete_organization(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> impl IntoResponse {
    info!("DELETE /organizations/{}", id);

    match state.organization_service.delete_organization(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Organization deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting organization {}: {}", id, e);
            e.into_response()
        }
    }
}
