//! Workflow steps as delivered by the consignment API

use serde::{Deserialize, Serialize};

/// Identifier of a step within one workflow
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Who acts on a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    TraderForm,
    OgaForm,
    WaitForEvent,
}

impl StepType {
    pub fn label(self) -> &'static str {
        match self {
            StepType::TraderForm => "Trader Form",
            StepType::OgaForm => "OGA Review",
            StepType::WaitForEvent => "Wait for Event",
        }
    }
}

/// Progress of a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Ready,
    InProgress,
    Locked,
    Completed,
    Rejected,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            StepStatus::Ready => "Ready",
            StepStatus::InProgress => "In Progress",
            StepStatus::Locked => "Locked",
            StepStatus::Completed => "Completed",
            StepStatus::Rejected => "Rejected",
        }
    }

    /// Colour hint for badges
    pub fn color(self) -> &'static str {
        match self {
            StepStatus::Ready => "blue",
            StepStatus::InProgress => "orange",
            StepStatus::Locked => "gray",
            StepStatus::Completed => "green",
            StepStatus::Rejected => "red",
        }
    }

    /// Whether a trader can open the step's task
    pub fn is_actionable(self) -> bool {
        matches!(self, StepStatus::Ready | StepStatus::InProgress)
    }
}

/// One step of a consignment workflow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub step_id: StepId,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub status: StepStatus,
    #[serde(default)]
    pub depends_on: Vec<StepId>,
    /// Task executing this step, once one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl WorkflowStep {
    pub fn new(step_id: impl Into<String>, step_type: StepType, status: StepStatus) -> Self {
        Self {
            step_id: StepId::new(step_id),
            step_type,
            status,
            depends_on: Vec::new(),
            task_id: None,
        }
    }

    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.depends_on.push(StepId::new(step_id));
        self
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.depends_on.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_wire_format() {
        let step: WorkflowStep = serde_json::from_value(json!({
            "stepId": "cusdec",
            "type": "TRADER_FORM",
            "status": "IN_PROGRESS",
            "dependsOn": ["general_info"],
            "taskId": "task-1"
        }))
        .unwrap();

        assert_eq!(step.step_id.as_str(), "cusdec");
        assert_eq!(step.step_type, StepType::TraderForm);
        assert_eq!(step.status, StepStatus::InProgress);
        assert_eq!(step.depends_on, vec![StepId::new("general_info")]);
        assert_eq!(step.task_id.as_deref(), Some("task-1"));
    }

    #[test]
    fn test_missing_depends_on_defaults_to_root() {
        let step: WorkflowStep = serde_json::from_value(json!({
            "stepId": "a", "type": "WAIT_FOR_EVENT", "status": "LOCKED"
        }))
        .unwrap();
        assert!(step.is_root());
    }

    #[test]
    fn test_status_hints() {
        assert_eq!(StepStatus::InProgress.label(), "In Progress");
        assert_eq!(StepStatus::Completed.color(), "green");
        assert_eq!(StepStatus::Locked.color(), "gray");
        assert!(StepStatus::Ready.is_actionable());
        assert!(!StepStatus::Locked.is_actionable());
    }
}
