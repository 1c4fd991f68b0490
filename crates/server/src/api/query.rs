//! Natural-language query endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use askdb_core::Record;

use crate::state::AppState;

use super::{parse_body, require_auth, required, ApiError, ErrorResponse};

/// Body shared by `/query`, `/explain` and `/validate`.
#[derive(Deserialize, ToSchema)]
pub struct QueryRequest {
    pub query: Option<String>,
}

impl QueryRequest {
    pub(crate) fn from_payload(
        payload: Result<Json<QueryRequest>, JsonRejection>,
    ) -> Result<String, ApiError> {
        required(parse_body(payload)?.query, "query")
    }
}

#[derive(Serialize, ToSchema)]
pub struct QueryResponse {
    pub original_query: String,
    pub translated_query: String,
    #[schema(value_type = Vec<Object>)]
    pub result: Vec<Record>,
    pub execution_time_ms: u64,
}

#[utoipa::path(
    post,
    path = "/query",
    tag = "Query",
    security(("bearer" = [])),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Translated and executed", body = QueryResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 401, description = "No bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn query(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    require_auth(&state, &headers)?;
    let question = QueryRequest::from_payload(payload)?;

    let outcome = state.engine.ask(&question);
    Ok(Json(QueryResponse {
        original_query: outcome.original_query,
        translated_query: outcome.translated_query,
        result: outcome.result,
        execution_time_ms: outcome.execution_time_ms,
    }))
}
