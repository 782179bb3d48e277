use crate::PortalClient;
use async_trait::async_trait;
use form_engine::{FileRef, FileUploader, SubmitError, UploadedFile};

/// File storage behind `POST /api/uploads`
#[derive(Clone, Debug)]
pub struct HttpFileStore {
    client: PortalClient,
}

impl HttpFileStore {
    pub fn new(client: PortalClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileUploader for HttpFileStore {
    async fn upload(&self, file: &FileRef) -> Result<UploadedFile, SubmitError> {
        self.client.upload_file(file).await.map_err(|e| {
            tracing::warn!(file = %file.name, error = %e, "Upload failed");
            SubmitError::upload(&file.name, e.to_string())
        })
    }

    fn file_url(&self, key: &str) -> String {
        self.client.file_url(key)
    }
}
