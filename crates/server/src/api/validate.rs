use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

use super::query::QueryRequest;
use super::{require_auth, ApiError, ErrorResponse};

#[derive(Serialize, ToSchema)]
pub struct ValidateResponse {
    pub original_query: String,
    pub is_valid: bool,
    pub validation_notes: Vec<String>,
}

/// Check a question against the catalog before running it.
#[utoipa::path(
    post,
    path = "/validate",
    tag = "Query",
    security(("bearer" = [])),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Validation verdict and notes", body = ValidateResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    require_auth(&state, &headers)?;
    let question = QueryRequest::from_payload(payload)?;

    let report = state.engine.validate(&question);
    Ok(Json(ValidateResponse {
        original_query: question,
        is_valid: report.is_valid,
        validation_notes: report.notes,
    }))
}
