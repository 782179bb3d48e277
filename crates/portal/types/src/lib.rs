//! Portal Types - wire types of the consignment, task and OGA APIs
//!
//! These mirror the JSON bodies exchanged with the external services:
//!
//! - **Consignment**: a trader's import/export shipment and its workflow steps
//! - **HsCode** / **Workflow**: catalogue entries used when creating a consignment
//! - **Task**: the `POST /api/tasks` envelope and the forms it returns
//! - **OgaApplication**: an officer's view of a task awaiting review
//!
//! Display helpers (labels, colour hints) live next to the enums they describe.

#![deny(unsafe_code)]

pub mod consignment;
pub mod hscode;
pub mod oga;
pub mod pagination;
pub mod task;
pub mod workflow;

pub use consignment::{
    Consignment, ConsignmentItem, ConsignmentState, CreateConsignmentItem,
    CreateConsignmentRequest, CreateConsignmentResponse, TradeFlow,
};
pub use hscode::{HsCode, HsCodeQuery};
pub use oga::{
    ApplicationMeta, ApplicationQuery, ApplicationStatus, ApproveRequest, Decision, OgaApplication,
    ReviewForm, ReviewResponse,
};
pub use pagination::Paginated;
pub use task::{
    ExecuteTaskRequest, ExecuteTaskResponse, ExecuteTaskResult, SimpleFormConfig, TaskAction,
    TaskApiError, TaskCommandResponse, TaskFormData, TaskPayload, READ_ONLY_PLUGIN_STATES,
};
pub use workflow::{StepConfig, Workflow, WorkflowTemplateStep, WorkflowsByFlow};

pub use workflow_graph::{StepId, StepStatus, StepType, WorkflowStep};
