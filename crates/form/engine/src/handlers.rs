//! Collaborators of the submit pipeline
//!
//! The engine does not know how files are stored or where submitted
//! values go. Hosts plug in a [`FileUploader`] and a [`SubmitHandler`].

use crate::SubmitError;
use async_trait::async_trait;
use form_types::FileRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of storing a file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Opaque storage key that replaces the file in submitted values
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Stores files and resolves storage keys to URLs
#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Upload one file and return its storage key
    async fn upload(&self, file: &FileRef) -> Result<UploadedFile, SubmitError>;

    /// Public URL of a previously stored file
    fn file_url(&self, key: &str) -> String;
}

/// Receives the JSON-ready values of a submitted form
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, values: Value) -> Result<(), SubmitError>;
}

/// Uploader for forms without file storage; every upload fails
#[derive(Clone, Copy, Debug, Default)]
pub struct NoUploader;

#[async_trait]
impl FileUploader for NoUploader {
    async fn upload(&self, file: &FileRef) -> Result<UploadedFile, SubmitError> {
        Err(SubmitError::upload(&file.name, "no file storage is configured"))
    }

    fn file_url(&self, key: &str) -> String {
        key.to_string()
    }
}
