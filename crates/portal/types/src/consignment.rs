//! Consignments and their workflow steps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use workflow_graph::WorkflowStep;

/// Direction of a shipment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeFlow {
    Import,
    Export,
}

impl TradeFlow {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeFlow::Import => "IMPORT",
            TradeFlow::Export => "EXPORT",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TradeFlow::Import => "blue",
            TradeFlow::Export => "green",
        }
    }
}

impl std::str::FromStr for TradeFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IMPORT" => Ok(TradeFlow::Import),
            "EXPORT" => Ok(TradeFlow::Export),
            other => Err(format!("unknown trade flow: {}", other)),
        }
    }
}

/// Overall state of a consignment as reported by the workflow service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsignmentState {
    InProgress,
    Finished,
    RequiresRework,
    /// A state this client does not know yet
    #[serde(untagged)]
    Other(String),
}

impl ConsignmentState {
    fn wire(&self) -> &str {
        match self {
            ConsignmentState::InProgress => "IN_PROGRESS",
            ConsignmentState::Finished => "FINISHED",
            ConsignmentState::RequiresRework => "REQUIRES_REWORK",
            ConsignmentState::Other(s) => s,
        }
    }

    /// `IN_PROGRESS` -> `In Progress`
    pub fn label(&self) -> String {
        self.wire()
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn color(&self) -> &'static str {
        match self {
            ConsignmentState::InProgress => "orange",
            ConsignmentState::Finished => "green",
            ConsignmentState::RequiresRework => "red",
            ConsignmentState::Other(_) => "gray",
        }
    }
}

/// One line of a consignment with its workflow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentItem {
    #[serde(rename = "hsCodeID", alias = "hsCodeId")]
    pub hs_code_id: String,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    pub id: String,
    pub trade_flow: TradeFlow,
    pub trader_id: String,
    pub state: ConsignmentState,
    #[serde(default)]
    pub items: Vec<ConsignmentItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Consignment {
    /// HS code of the first item, which is what list views show
    pub fn primary_hs_code(&self) -> Option<&str> {
        self.items.first().map(|item| item.hs_code_id.as_str())
    }

    /// Steps of every item, in item order
    pub fn steps(&self) -> impl Iterator<Item = &WorkflowStep> {
        self.items.iter().flat_map(|item| item.steps.iter())
    }

    /// Steps a trader can act on right now
    pub fn actionable_steps(&self) -> impl Iterator<Item = &WorkflowStep> {
        self.steps().filter(|step| step.status.is_actionable())
    }

    /// Find the step executed by a task
    pub fn step_for_task(&self, task_id: &str) -> Option<&WorkflowStep> {
        self.steps().find(|step| step.task_id.as_deref() == Some(task_id))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsignmentItem {
    pub hs_code_id: String,
    #[serde(default)]
    pub metadata: Value,
    pub workflow_template_id: String,
}

/// Body of `POST /api/consignments`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsignmentRequest {
    pub trade_flow: TradeFlow,
    pub trader_id: String,
    pub items: Vec<CreateConsignmentItem>,
}

impl CreateConsignmentRequest {
    pub fn new(trade_flow: TradeFlow, trader_id: impl Into<String>) -> Self {
        Self {
            trade_flow,
            trader_id: trader_id.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(
        mut self,
        hs_code_id: impl Into<String>,
        workflow_template_id: impl Into<String>,
    ) -> Self {
        self.items.push(CreateConsignmentItem {
            hs_code_id: hs_code_id.into(),
            metadata: Value::Object(Default::default()),
            workflow_template_id: workflow_template_id.into(),
        });
        self
    }
}

/// The service echoes the created consignment; only `id` is guaranteed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateConsignmentResponse {
    pub id: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workflow_graph::StepStatus;

    fn sample() -> Consignment {
        serde_json::from_value(json!({
            "id": "c-1",
            "tradeFlow": "EXPORT",
            "traderId": "trader-123",
            "state": "IN_PROGRESS",
            "items": [{
                "hsCodeID": "0902.20.19",
                "steps": [
                    {"stepId": "general_info", "type": "TRADER_FORM", "status": "COMPLETED", "taskId": "t-1"},
                    {"stepId": "npqs", "type": "OGA_FORM", "status": "READY", "dependsOn": ["general_info"], "taskId": "t-2"}
                ]
            }],
            "createdAt": "2026-01-27T10:30:00Z",
            "updatedAt": "2026-01-27T11:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_consignment_wire_format() {
        let c = sample();
        assert_eq!(c.trade_flow, TradeFlow::Export);
        assert_eq!(c.primary_hs_code(), Some("0902.20.19"));
        assert_eq!(c.steps().count(), 2);
        assert_eq!(c.step_for_task("t-2").unwrap().status, StepStatus::Ready);
        assert_eq!(c.actionable_steps().count(), 1);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ConsignmentState::InProgress.label(), "In Progress");
        assert_eq!(ConsignmentState::RequiresRework.label(), "Requires Rework");
        assert_eq!(ConsignmentState::Finished.color(), "green");

        let other: ConsignmentState = serde_json::from_value(json!("ON_HOLD")).unwrap();
        assert_eq!(other, ConsignmentState::Other("ON_HOLD".into()));
        assert_eq!(other.label(), "On Hold");
        assert_eq!(other.color(), "gray");
    }

    #[test]
    fn test_create_request_body() {
        let req = CreateConsignmentRequest::new(TradeFlow::Import, "trader-123")
            .with_item("hs-1", "wf-import");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "tradeFlow": "IMPORT",
                "traderId": "trader-123",
                "items": [{"hsCodeId": "hs-1", "metadata": {}, "workflowTemplateId": "wf-import"}]
            })
        );
    }

    #[test]
    fn test_trade_flow_parse() {
        assert_eq!("export".parse::<TradeFlow>().unwrap(), TradeFlow::Export);
        assert!("both".parse::<TradeFlow>().is_err());
    }
}
