//! Task execution envelope of `POST /api/tasks`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plugin states in which the trader form can no longer be edited
pub const READ_ONLY_PLUGIN_STATES: &[&str] = &["OGA_REVIEWED", "SUBMITTED", "OGA_ACKNOWLEDGED"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAction {
    /// Load the task's form
    FetchForm,
    SubmitForm,
    /// Save without submitting
    Draft,
}

/// `payload` of a task request. `data` accompanies fetches, `content` commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub action: TaskAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Body of `POST /api/tasks` (snake_case keys on the wire)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    pub task_id: String,
    pub consignment_id: String,
    pub payload: TaskPayload,
}

impl ExecuteTaskRequest {
    pub fn fetch_form(task_id: impl Into<String>, consignment_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            consignment_id: consignment_id.into(),
            payload: TaskPayload {
                action: TaskAction::FetchForm,
                data: None,
                content: None,
            },
        }
    }

    /// `SUBMIT_FORM` or `DRAFT` with the form values as `content`
    pub fn command(
        action: TaskAction,
        task_id: impl Into<String>,
        consignment_id: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            consignment_id: consignment_id.into(),
            payload: TaskPayload {
                action,
                data: None,
                content: Some(content),
            },
        }
    }
}

/// A form as delivered for a task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub schema: Value,
    /// `null` or `{}` when the form should use a generated layout
    #[serde(default)]
    pub ui_schema: Value,
    #[serde(default)]
    pub form_data: Value,
}

/// Forms shown for a simple-form task. Only the trader form is editable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleFormConfig {
    pub trader_form_info: TaskFormData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oga_review_form: Option<TaskFormData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_response_form: Option<TaskFormData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteTaskResult {
    /// Plugin state, e.g. `DRAFT` or `OGA_REVIEWED`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: TaskFormData,
}

impl ExecuteTaskResult {
    pub fn is_read_only(&self) -> bool {
        READ_ONLY_PLUGIN_STATES.contains(&self.status.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskApiError {
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteTaskResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<ExecuteTaskResult>,
    #[serde(default)]
    pub error: Option<TaskApiError>,
}

/// Response to a `SUBMIT_FORM` or `DRAFT` command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCommandResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskApiError>,
}

impl TaskCommandResponse {
    /// Best available explanation of a failed command
    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .or_else(|| Some(self.message.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| "Task command was not accepted".to_string())
    }
}
