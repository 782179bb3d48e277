use crate::{layout, GraphLayout, GraphResult, WorkflowStep};

/// Caches the layout of a workflow and recomputes it only when the steps change
#[derive(Debug, Default)]
pub struct WorkflowView {
    steps: Vec<WorkflowStep>,
    layout: GraphLayout,
}

impl WorkflowView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view for an initial set of steps
    pub fn from_steps(steps: &[WorkflowStep]) -> GraphResult<Self> {
        let mut view = Self::new();
        view.update(steps)?;
        Ok(view)
    }

    /// Replace the steps. Returns `true` when the layout was recomputed.
    ///
    /// On error the previous layout is kept.
    pub fn update(&mut self, steps: &[WorkflowStep]) -> GraphResult<bool> {
        if self.steps == steps {
            return Ok(false);
        }
        let layout = layout(steps)?;
        tracing::debug!(
            steps = steps.len(),
            edges = layout.edges.len(),
            "Recomputed workflow layout"
        );
        self.steps = steps.to_vec();
        self.layout = layout;
        Ok(true)
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }
}
