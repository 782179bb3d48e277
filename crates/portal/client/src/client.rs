//! HTTP client for the portal APIs

use crate::{ClientError, ClientResult};
use form_engine::{FileRef, UploadedFile};
use portal_types::*;
use reqwest::{multipart, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Client for the consignment, task and OGA services
#[derive(Clone, Debug)]
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Consignments ─────────────────────────────────────────────────

    /// List a trader's consignments
    pub async fn list_consignments(&self, trader_id: &str) -> ClientResult<Paginated<Consignment>> {
        self.get_query("/api/consignments", &[("traderId", trader_id.to_string())])
            .await
    }

    /// Get a consignment; `None` when it does not exist
    pub async fn get_consignment(&self, id: &str) -> ClientResult<Option<Consignment>> {
        optional(self.get(&format!("/api/consignments/{}", id)).await)
    }

    pub async fn create_consignment(
        &self,
        request: &CreateConsignmentRequest,
    ) -> ClientResult<CreateConsignmentResponse> {
        let created: CreateConsignmentResponse = self.post("/api/consignments", request).await?;
        tracing::info!(consignment_id = %created.id, "Consignment created");
        Ok(created)
    }

    // ── Catalogue ────────────────────────────────────────────────────

    pub async fn search_hs_codes(&self, query: &HsCodeQuery) -> ClientResult<Paginated<HsCode>> {
        self.get_query("/api/hscodes", &query.to_pairs()).await
    }

    /// Workflow templates available for an HS code, by trade flow
    pub async fn workflows_for_hs_code(&self, hs_code: &str) -> ClientResult<WorkflowsByFlow> {
        self.get_query("/api/workflows", &[("hs_code", hs_code.to_string())])
            .await
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn execute_task(&self, request: &ExecuteTaskRequest) -> ClientResult<ExecuteTaskResponse> {
        tracing::debug!(
            task_id = %request.task_id,
            action = ?request.payload.action,
            "Executing task"
        );
        self.post("/api/tasks", request).await
    }

    /// Fetch the form of a task
    pub async fn fetch_task_form(
        &self,
        task_id: &str,
        consignment_id: &str,
    ) -> ClientResult<ExecuteTaskResponse> {
        self.execute_task(&ExecuteTaskRequest::fetch_form(task_id, consignment_id))
            .await
    }

    /// Send `SUBMIT_FORM` or `DRAFT` with the form values
    pub async fn send_task_command(
        &self,
        action: TaskAction,
        task_id: &str,
        consignment_id: &str,
        content: Value,
    ) -> ClientResult<TaskCommandResponse> {
        let request = ExecuteTaskRequest::command(action, task_id, consignment_id, content);
        tracing::debug!(task_id = %task_id, action = ?action, "Sending task command");
        self.post("/api/tasks", &request).await
    }

    // ── OGA review ───────────────────────────────────────────────────

    pub async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> ClientResult<Paginated<OgaApplication>> {
        self.get_query("/api/oga/applications", &query.to_pairs())
            .await
    }

    /// Get an application; `None` when it does not exist
    pub async fn get_application(&self, task_id: &str) -> ClientResult<Option<OgaApplication>> {
        optional(self.get(&format!("/api/oga/applications/{}", task_id)).await)
    }

    /// Submit review form values
    pub async fn submit_review(&self, task_id: &str, values: &Value) -> ClientResult<ReviewResponse> {
        self.post(&format!("/api/oga/applications/{}/review", task_id), values)
            .await
    }

    pub async fn approve(&self, task_id: &str, request: &ApproveRequest) -> ClientResult<ReviewResponse> {
        self.post(&format!("/api/oga/applications/{}/approve", task_id), request)
            .await
    }

    // ── Uploads ──────────────────────────────────────────────────────

    /// Store a file as multipart field `file`
    pub async fn upload_file(&self, file: &FileRef) -> ClientResult<UploadedFile> {
        let part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("{}/api/uploads", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;
        let uploaded: UploadedFile = self.handle_response(response).await?;

        tracing::info!(file = %file.name, key = %uploaded.key, size = file.size(), "File uploaded");
        Ok(uploaded)
    }

    /// Download URL of a stored file
    pub fn file_url(&self, key: &str) -> String {
        format!("{}/api/uploads/{}", self.base_url, key)
    }

    // ── Internal HTTP helpers ────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_query(path, &[]).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(response.url().path().to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request failed").to_string()
            });
            tracing::warn!(status = status.as_u16(), message = %message, "API request failed");
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Pull `error` or `message` out of a JSON error body, else use the raw text
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["error", "message"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(String::from)
            .or_else(|| Some(trimmed.to_string())),
        _ => Some(trimmed.to_string()),
    }
}

fn optional<T>(result: ClientResult<T>) -> ClientResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClientError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Run a client call until it completes or `token` is cancelled. A
/// cancelled call returns [`ClientError::Cancelled`] and its response is
/// never observed.
pub async fn cancellable<T, F>(token: &CancellationToken, call: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    if token.is_cancelled() {
        return Err(ClientError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Request cancelled");
            Err(ClientError::Cancelled)
        }
        result = call => result,
    }
}
