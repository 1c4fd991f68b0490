//! Access token issuance.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::state::AppState;

use super::{error_response, parse_body, required, ApiError, ErrorResponse};

#[derive(Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[utoipa::path(
    post,
    path = "/token",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let req = parse_body(payload)?;
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;

    let user = state.users.authenticate(&username, &password).map_err(|e| {
        warn!("Login refused for '{}'", username);
        error_response(e)
    })?;
    let access_token = state.tokens.issue(&user.username).map_err(error_response)?;

    info!("Issued token for '{}'", user.username);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
