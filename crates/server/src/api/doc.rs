//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]` handlers and `ToSchema` types into one
//! OpenAPI 3.1 document, served via Scalar UI at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "askdb API",
        version = "0.1.0",
        description = "Plain-English analytics questions answered from an in-memory catalog.",
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Service banner and liveness"),
        (name = "Auth", description = "Bearer token issuance"),
        (name = "Query", description = "Question translation, execution, explanation and validation"),
        (name = "Catalog", description = "Loaded tables and their fields"),
    ),
    paths(
        crate::api::health::root,
        crate::api::health::health,
        crate::api::health::catalog,
        crate::api::token::token,
        crate::api::query::query,
        crate::api::explain::explain,
        crate::api::validate::validate,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::RootResponse,
        crate::api::health::HealthResponse,
        crate::api::health::CatalogResponse,
        crate::api::token::TokenRequest,
        crate::api::token::TokenResponse,
        crate::api::query::QueryRequest,
        crate::api::query::QueryResponse,
        crate::api::explain::ExplainResponse,
        crate::api::validate::ValidateResponse,
    ))
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
