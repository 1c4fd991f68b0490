use thiserror::Error;

/// Errors surfaced at the operation boundary.
///
/// Lookup misses (unknown table, unknown field) are not errors: the
/// executor answers them with empty rows and the validator with notes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AskError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl AskError {
    /// Shorthand for a missing or malformed request field.
    pub fn missing_field(field: &str) -> Self {
        AskError::InvalidInput(format!("Missing or invalid '{}' field", field))
    }
}

pub type Result<T> = std::result::Result<T, AskError>;
