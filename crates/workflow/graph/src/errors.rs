use crate::StepId;
use thiserror::Error;

/// Errors that can occur while laying out a workflow graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Cycle detected in step dependencies: {}", format_path(.path))]
    CycleDetected { path: Vec<StepId> },

    #[error("Duplicate step ID: {0}")]
    DuplicateStep(StepId),
}

fn format_path(path: &[StepId]) -> String {
    path.iter()
        .map(StepId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
