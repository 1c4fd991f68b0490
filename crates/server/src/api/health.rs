//! Banner, health and catalog listing endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use askdb_catalog::TableSummary;

use crate::state::AppState;

use super::{require_auth, ApiError, ErrorResponse};

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Gen AI Analytics Simulation API",
    })
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize, ToSchema)]
pub struct CatalogResponse {
    #[schema(value_type = Vec<Object>)]
    pub tables: Vec<TableSummary>,
}

/// Tables, row counts and field names of the loaded catalog.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "Catalog",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Catalog tables", body = CatalogResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn catalog(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogResponse>, ApiError> {
    require_auth(&state, &headers)?;
    Ok(Json(CatalogResponse {
        tables: state.engine.catalog().summary(),
    }))
}
