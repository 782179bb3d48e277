use form_engine::FormError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading instances or settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config not found for instance: {instance}. Available: {}", .available.join(", "))]
    InstanceNotFound {
        instance: String,
        available: Vec<String>,
    },

    #[error("Review form not found: {form_id}")]
    ReviewFormNotFound { form_id: String },

    #[error("Duplicate review form: {0}")]
    DuplicateReviewForm(String),

    #[error("Review form {form_id} is invalid: {source}")]
    InvalidReviewForm {
        form_id: String,
        #[source]
        source: FormError,
    },

    #[error("Failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid instance file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    Settings(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
