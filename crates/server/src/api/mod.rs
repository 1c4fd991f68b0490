//! HTTP endpoint modules.
//!
//! Shared error mapping, the bearer-token guard and request body parsing
//! live here; each sub-module owns one endpoint group.

pub mod doc;
mod explain;
mod health;
mod query;
mod token;
mod validate;

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use askdb_core::AskError;

use crate::auth::bearer_token;
use crate::state::AppState;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Status code and body for every error a handler can return.
pub(crate) fn error_response(err: AskError) -> ApiError {
    let status = match &err {
        AskError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AskError::Unauthenticated | AskError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AskError::Forbidden(_) => StatusCode::FORBIDDEN,
        AskError::Config(_) | AskError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ── Auth guard ───────────────────────────────────────────────────

/// Username of the bearer of a valid token. No token is 401; a token that
/// fails verification is 403.
pub(crate) fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| error_response(AskError::Unauthenticated))?;

    state
        .tokens
        .verify(token)
        .map(|claims| claims.sub)
        .map_err(|e| {
            warn!("Rejected bearer token: {:?}", e);
            error_response(e)
        })
}

// ── Body parsing ─────────────────────────────────────────────────

/// Unwrap a JSON body, turning a malformed one into a 400.
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error_response(AskError::InvalidInput(rejection.body_text())))
}

/// A required string field; absent is a 400, empty is allowed.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| error_response(AskError::missing_field(field)))
}

// ── Re-exports ───────────────────────────────────────────────────

pub use explain::explain;
pub use health::{catalog, health, root};
pub use query::query;
pub use token::token;
pub use validate::validate;
