//! Layered layout of a step dependency graph

use crate::{GraphError, GraphResult, StepId, StepStatus, StepType, WorkflowStep};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Horizontal distance between depth columns
pub const HORIZONTAL_SPACING: f64 = 300.0;
/// Vertical distance between siblings in a column
pub const VERTICAL_SPACING: f64 = 120.0;

// ── Output Types ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A positioned step
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: StepId,
    pub depth: usize,
    pub position: Position,
    pub status: StepStatus,
    pub step_type: StepType,
}

/// Display state of a dependency edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeState {
    /// The source step is completed
    Satisfied,
    Pending,
}

impl EdgeState {
    /// Stroke colour used by the graph viewer
    pub fn color(self) -> &'static str {
        match self {
            EdgeState::Satisfied => "#10b981",
            EdgeState::Pending => "#64748b",
        }
    }
}

/// A directed edge from a dependency to the step that needs it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    /// `<source>-<target>`
    pub id: String,
    pub source: StepId,
    pub target: StepId,
    pub state: EdgeState,
}

/// Nodes in input order and edges in `(step, dependency)` input order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl GraphLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.node(id).map(|n| n.depth)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&LayoutEdge> {
        self.edges
            .iter()
            .find(|e| e.source.as_str() == source && e.target.as_str() == target)
    }

    /// Number of depth columns
    pub fn columns(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }
}

// ── Layout ───────────────────────────────────────────────────────────

/// Lay out a set of workflow steps.
///
/// Fails on duplicate step ids and on dependency cycles. A dependency on a
/// step that is not in the set counts as a root and its edge stays pending.
pub fn layout(steps: &[WorkflowStep]) -> GraphResult<GraphLayout> {
    let mut index: HashMap<&str, &WorkflowStep> = HashMap::with_capacity(steps.len());
    for step in steps {
        if index.insert(step.step_id.as_str(), step).is_some() {
            return Err(GraphError::DuplicateStep(step.step_id.clone()));
        }
    }

    let depths = compute_depths(steps, &index)?;

    let mut columns: HashMap<usize, Vec<&StepId>> = HashMap::new();
    for step in steps {
        let depth = depths.get(step.step_id.as_str()).copied().unwrap_or(0);
        columns.entry(depth).or_default().push(&step.step_id);
    }

    let nodes = steps
        .iter()
        .map(|step| {
            let depth = depths.get(step.step_id.as_str()).copied().unwrap_or(0);
            let column = columns.get(&depth).map(Vec::as_slice).unwrap_or_default();
            let row = column.iter().position(|id| *id == &step.step_id).unwrap_or(0);
            LayoutNode {
                id: step.step_id.clone(),
                depth,
                position: position(depth, row, column.len()),
                status: step.status,
                step_type: step.step_type,
            }
        })
        .collect();

    let edges = steps
        .iter()
        .flat_map(|step| {
            step.depends_on.iter().map(|dep| {
                let satisfied = index
                    .get(dep.as_str())
                    .is_some_and(|source| source.status == StepStatus::Completed);
                LayoutEdge {
                    id: format!("{}-{}", dep, step.step_id),
                    source: dep.clone(),
                    target: step.step_id.clone(),
                    state: if satisfied {
                        EdgeState::Satisfied
                    } else {
                        EdgeState::Pending
                    },
                }
            })
        })
        .collect();

    Ok(GraphLayout { nodes, edges })
}

fn position(depth: usize, row: usize, column_len: usize) -> Position {
    let start_y = -((column_len.saturating_sub(1)) as f64) * VERTICAL_SPACING / 2.0;
    Position {
        x: depth as f64 * HORIZONTAL_SPACING,
        y: start_y + row as f64 * VERTICAL_SPACING,
    }
}

enum Mark {
    Visiting,
    Done(usize),
}

enum Next<'a> {
    Descend(&'a str),
    Skip,
    Finish,
}

/// Longest-path depth of every step, via an explicit-stack DFS
fn compute_depths<'a>(
    steps: &'a [WorkflowStep],
    index: &HashMap<&'a str, &'a WorkflowStep>,
) -> GraphResult<HashMap<&'a str, usize>> {
    let mut marks: HashMap<&'a str, Mark> = HashMap::with_capacity(steps.len());
    let mut unknown: HashSet<&'a str> = HashSet::new();

    for root in steps {
        let root_id = root.step_id.as_str();
        if marks.contains_key(root_id) {
            continue;
        }
        marks.insert(root_id, Mark::Visiting);
        let mut stack: Vec<(&'a WorkflowStep, usize)> = vec![(root, 0)];

        while let Some((step, cursor)) = stack.last_mut() {
            let step: &'a WorkflowStep = *step;
            let next = match step.depends_on.get(*cursor) {
                Some(dep) => {
                    *cursor += 1;
                    let dep_id = dep.as_str();
                    match (index.get(dep_id), marks.get(dep_id)) {
                        (None, _) => {
                            if unknown.insert(dep_id) {
                                tracing::warn!(
                                    step = %step.step_id,
                                    dependency = %dep,
                                    "Step depends on an unknown step; treating it as a root"
                                );
                            }
                            Next::Skip
                        }
                        (Some(_), Some(Mark::Visiting)) => {
                            let start = stack
                                .iter()
                                .position(|(s, _)| s.step_id.as_str() == dep_id)
                                .unwrap_or(0);
                            let mut path: Vec<StepId> =
                                stack[start..].iter().map(|(s, _)| s.step_id.clone()).collect();
                            path.push(dep.clone());
                            tracing::warn!(cycle = ?path, "Rejecting cyclic workflow");
                            return Err(GraphError::CycleDetected { path });
                        }
                        (Some(_), Some(Mark::Done(_))) => Next::Skip,
                        (Some(_), None) => Next::Descend(dep_id),
                    }
                }
                None => Next::Finish,
            };

            match next {
                Next::Descend(dep_id) => {
                    if let Some(dep_step) = index.get(dep_id) {
                        marks.insert(dep_id, Mark::Visiting);
                        stack.push((*dep_step, 0));
                    }
                }
                Next::Skip => {}
                Next::Finish => {
                    let depth = step
                        .depends_on
                        .iter()
                        .map(|dep| match marks.get(dep.as_str()) {
                            Some(Mark::Done(d)) => d + 1,
                            _ => 1,
                        })
                        .max()
                        .unwrap_or(0);
                    marks.insert(step.step_id.as_str(), Mark::Done(depth));
                    stack.pop();
                }
            }
        }
    }

    Ok(marks
        .into_iter()
        .filter_map(|(id, mark)| match mark {
            Mark::Done(depth) => Some((id, depth)),
            Mark::Visiting => None,
        })
        .collect())
}
