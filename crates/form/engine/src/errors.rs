//! Submission errors
//!
//! Definition and state errors use [`form_types::FormError`]. Failures of
//! the asynchronous submit pipeline are reported as [`SubmitError`] so the
//! engine can keep the message as the form's `submit_error`.

use form_types::FormError;
use thiserror::Error;

/// Errors raised while submitting a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Upload failed for '{name}': {message}")]
    Upload { name: String, message: String },

    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Submission failed: {0}")]
    Transport(String),

    #[error("Invalid payload: {0}")]
    Payload(String),
}

impl SubmitError {
    pub fn upload(name: impl Into<String>, message: impl Into<String>) -> Self {
        SubmitError::Upload {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<FormError> for SubmitError {
    fn from(err: FormError) -> Self {
        SubmitError::Payload(err.to_string())
    }
}
