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
pub struct ExplainResponse {
    pub original_query: String,
    pub query_steps: Vec<String>,
    pub potential_limitations: Vec<String>,
}

/// Describe how a question would be answered, without running it.
#[utoipa::path(
    post,
    path = "/explain",
    tag = "Query",
    security(("bearer" = [])),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Processing steps and caveats", body = ExplainResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn explain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    require_auth(&state, &headers)?;
    let question = QueryRequest::from_payload(payload)?;

    let explanation = state.engine.explain(&question);
    Ok(Json(ExplainResponse {
        original_query: question,
        query_steps: explanation.steps,
        potential_limitations: explanation.limitations,
    }))
}
