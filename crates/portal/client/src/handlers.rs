//! Submit handlers that deliver form values to the portal APIs

use crate::PortalClient;
use async_trait::async_trait;
use form_engine::{SubmitError, SubmitHandler};
use portal_types::{ApproveRequest, Decision, TaskAction};
use serde_json::Value;

/// Submits a trader form as a task command
#[derive(Clone, Debug)]
pub struct TaskSubmitHandler {
    client: PortalClient,
    task_id: String,
    consignment_id: String,
    action: TaskAction,
}

impl TaskSubmitHandler {
    pub fn new(client: PortalClient, task_id: impl Into<String>, consignment_id: impl Into<String>) -> Self {
        Self {
            client,
            task_id: task_id.into(),
            consignment_id: consignment_id.into(),
            action: TaskAction::SubmitForm,
        }
    }

    /// Save as a draft instead of submitting
    pub fn as_draft(mut self) -> Self {
        self.action = TaskAction::Draft;
        self
    }
}

#[async_trait]
impl SubmitHandler for TaskSubmitHandler {
    async fn submit(&self, values: Value) -> Result<(), SubmitError> {
        let response = self
            .client
            .send_task_command(self.action, &self.task_id, &self.consignment_id, values)
            .await?;

        if !response.success {
            return Err(SubmitError::Rejected(response.failure_message()));
        }
        tracing::info!(task_id = %self.task_id, action = ?self.action, "Task form submitted");
        Ok(())
    }
}

/// Submits an officer's review form
#[derive(Clone, Debug)]
pub struct ReviewSubmitHandler {
    client: PortalClient,
    task_id: String,
}

impl ReviewSubmitHandler {
    pub fn new(client: PortalClient, task_id: impl Into<String>) -> Self {
        Self {
            client,
            task_id: task_id.into(),
        }
    }
}

#[async_trait]
impl SubmitHandler for ReviewSubmitHandler {
    async fn submit(&self, values: Value) -> Result<(), SubmitError> {
        let response = self.client.submit_review(&self.task_id, &values).await?;
        if !response.success {
            return Err(SubmitError::Rejected(response.failure_message()));
        }
        tracing::info!(task_id = %self.task_id, "Review submitted");
        Ok(())
    }
}

/// Approves or rejects an application. The officer's values are merged
/// over the trader's submitted data before sending.
#[derive(Clone, Debug)]
pub struct ApprovalSubmitHandler {
    client: PortalClient,
    task_id: String,
    consignment_id: String,
    decision: Decision,
    reviewer_name: String,
    comments: Option<String>,
    trader_data: Value,
}

impl ApprovalSubmitHandler {
    pub fn new(
        client: PortalClient,
        task_id: impl Into<String>,
        consignment_id: impl Into<String>,
        decision: Decision,
        reviewer_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            task_id: task_id.into(),
            consignment_id: consignment_id.into(),
            decision,
            reviewer_name: reviewer_name.into(),
            comments: None,
            trader_data: Value::Null,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn with_trader_data(mut self, data: Value) -> Self {
        self.trader_data = data;
        self
    }

    fn merged(&self, review: Value) -> Value {
        match (self.trader_data.clone(), review) {
            (Value::Object(mut base), Value::Object(review)) => {
                base.extend(review);
                Value::Object(base)
            }
            (_, review) => review,
        }
    }
}

#[async_trait]
impl SubmitHandler for ApprovalSubmitHandler {
    async fn submit(&self, values: Value) -> Result<(), SubmitError> {
        let request = ApproveRequest {
            form_data: self.merged(values),
            consignment_id: self.consignment_id.clone(),
            decision: self.decision,
            reviewer_name: self.reviewer_name.clone(),
            comments: self.comments.clone(),
        };
        let response = self.client.approve(&self.task_id, &request).await?;
        if !response.success {
            return Err(SubmitError::Rejected(response.failure_message()));
        }
        tracing::info!(task_id = %self.task_id, decision = ?self.decision, "Application decided");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_review_values_override_trader_data() {
        let client = PortalClient::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        let handler = ApprovalSubmitHandler::new(client, "t", "c", Decision::Approved, "Officer")
            .with_trader_data(json!({"exporterName": "Ceylon Leaf", "remarks": "trader note"}));

        assert_eq!(
            handler.merged(json!({"remarks": "officer note", "decision": "APPROVED"})),
            json!({"exporterName": "Ceylon Leaf", "remarks": "officer note", "decision": "APPROVED"})
        );
    }
}
