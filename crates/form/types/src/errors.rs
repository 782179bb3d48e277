//! Error types for form definitions and values

/// Errors raised while loading a form definition or addressing its values
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Invalid scope {scope}: {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("Scope does not resolve against the schema: {scope}")]
    UnresolvedScope { scope: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid UI schema: {0}")]
    InvalidUiSchema(String),

    #[error("File rejected for {field}: {reason}")]
    FileRejected { field: String, reason: String },

    #[error("File has not been uploaded: {name}")]
    UnresolvedFile { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for form operations
pub type FormResult<T> = Result<T, FormError>;
