//! Workflow templates offered for an HS code

use serde::{Deserialize, Serialize};
use workflow_graph::{StepId, StepType};

/// Per-step configuration of a template
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// A step of a workflow template (no status yet)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplateStep {
    pub step_id: StepId,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub config: StepConfig,
    #[serde(default)]
    pub depends_on: Vec<StepId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub flow: String,
    #[serde(default)]
    pub steps: Vec<WorkflowTemplateStep>,
}

/// Response of `GET /api/workflows?hs_code=<code>`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowsByFlow {
    #[serde(default)]
    pub import: Vec<Workflow>,
    #[serde(default)]
    pub export: Vec<Workflow>,
}

impl WorkflowsByFlow {
    pub fn for_flow(&self, flow: crate::TradeFlow) -> &[Workflow] {
        match flow {
            crate::TradeFlow::Import => &self.import,
            crate::TradeFlow::Export => &self.export,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.import.is_empty() && self.export.is_empty()
    }
}
