//! Workflow graph layout

use crate::output::{paint, print_json, OutputFormat};
use anyhow::{anyhow, Context};
use clap::Args;
use colored::*;
use portal_client::PortalClient;
use portal_types::Consignment;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use workflow_graph::{layout, EdgeState, GraphLayout, WorkflowStep};

#[derive(Args)]
pub struct LayoutArgs {
    /// JSON file holding a steps array or a consignment
    #[arg(short, long, conflicts_with = "consignment")]
    file: Option<PathBuf>,

    /// Consignment to fetch and lay out
    #[arg(short, long)]
    consignment: Option<String>,
}

pub async fn execute(args: LayoutArgs, client: &PortalClient, format: OutputFormat) -> anyhow::Result<()> {
    let steps = match (args.file, args.consignment) {
        (Some(path), _) => read_steps(&path)?,
        (None, Some(id)) => client
            .get_consignment(&id)
            .await?
            .ok_or_else(|| anyhow!("Consignment not found: {}", id))?
            .steps()
            .cloned()
            .collect(),
        (None, None) => anyhow::bail!("Pass --file or --consignment"),
    };

    let graph = layout(&steps)?;
    print_layout(&graph, format)
}

/// Steps from either a bare array or a consignment document
fn read_steps(path: &Path) -> anyhow::Result<Vec<WorkflowStep>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    parse_steps(&raw).with_context(|| format!("{} holds neither steps nor a consignment", path.display()))
}

fn parse_steps(raw: &str) -> anyhow::Result<Vec<WorkflowStep>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }
    let consignment: Consignment = serde_json::from_value(value)?;
    Ok(consignment.steps().cloned().collect())
}

#[derive(Serialize, Tabled)]
struct NodeRow {
    step: String,
    #[tabled(rename = "type")]
    step_type: String,
    status: String,
    depth: usize,
    x: String,
    y: String,
}

/// Print nodes as a table and edges as coloured arrows
pub fn print_layout(graph: &GraphLayout, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        return print_json(graph);
    }

    let rows: Vec<NodeRow> = graph
        .nodes
        .iter()
        .map(|node| NodeRow {
            step: node.id.to_string(),
            step_type: node.step_type.label().to_string(),
            status: paint(node.status.label(), node.status.color()).to_string(),
            depth: node.depth,
            x: format!("{:.0}", node.position.x),
            y: format!("{:.0}", node.position.y),
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No steps".dimmed());
        return Ok(());
    }
    println!("{}", Table::new(rows));

    if !graph.edges.is_empty() {
        println!("\nDependencies ({} columns):", graph.columns());
        for edge in &graph.edges {
            let arrow = match edge.state {
                EdgeState::Satisfied => "──▶".green(),
                EdgeState::Pending => "╌╌▶".dimmed(),
            };
            println!("  {} {} {}", edge.source, arrow, edge.target);
        }
    }
    Ok(())
}
