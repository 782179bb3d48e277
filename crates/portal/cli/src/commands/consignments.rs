//! Consignment commands

use crate::commands::layout::print_layout;
use crate::output::{paint, print_info, print_json, print_output, print_success, short_id, OutputFormat};
use anyhow::{anyhow, bail};
use clap::Subcommand;
use colored::*;
use portal_client::PortalClient;
use portal_config::PortalSettings;
use portal_types::{Consignment, CreateConsignmentRequest, TradeFlow};
use serde::Serialize;
use tabled::Tabled;
use workflow_graph::layout;

/// Consignment subcommands
#[derive(Subcommand)]
pub enum ConsignmentCommands {
    /// List a trader's consignments
    List {
        /// Trader ID (defaults to the configured trader)
        #[arg(short, long)]
        trader: Option<String>,
    },

    /// Show a consignment with its workflow
    Show {
        /// Consignment ID
        id: String,
    },

    /// List workflow templates for an HS code
    Workflows {
        /// HS code ID
        hs_code: String,

        /// Only this trade flow (IMPORT or EXPORT)
        #[arg(short, long)]
        flow: Option<TradeFlow>,
    },

    /// Start a consignment
    Create {
        /// Trade flow (IMPORT or EXPORT)
        #[arg(short, long)]
        flow: TradeFlow,

        /// HS code ID of the single item
        #[arg(long)]
        hs_code: String,

        /// Workflow template; the first one offered for the flow when omitted
        #[arg(short, long)]
        workflow: Option<String>,
    },
}

/// Execute a consignment command
pub async fn execute(
    command: ConsignmentCommands,
    client: &PortalClient,
    settings: &PortalSettings,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        ConsignmentCommands::List { trader } => {
            let trader = trader.as_deref().unwrap_or(&settings.trader_id);
            let page = client.list_consignments(trader).await?;
            let total = page.total;
            let rows: Vec<ConsignmentRow> = page.items.into_iter().map(Into::into).collect();
            let shown = rows.len();
            print_output(rows, format)?;
            if let OutputFormat::Table = format {
                if total > shown as u64 {
                    print_info(&format!("Showing {} of {} consignments", shown, total));
                }
            }
            Ok(())
        }

        ConsignmentCommands::Show { id } => {
            let consignment = client
                .get_consignment(&id)
                .await?
                .ok_or_else(|| anyhow!("Consignment not found: {}", id))?;

            if let OutputFormat::Json = format {
                return print_json(&consignment);
            }
            print_consignment(&consignment);

            println!();
            let steps: Vec<_> = consignment.steps().cloned().collect();
            print_layout(&layout(&steps)?, format)?;

            let actionable: Vec<_> = consignment.actionable_steps().collect();
            if !actionable.is_empty() {
                println!("\nOpen tasks:");
                for step in actionable {
                    println!(
                        "  {} {} {}",
                        step.step_id,
                        step.step_type.label().dimmed(),
                        step.task_id.as_deref().unwrap_or("-").cyan()
                    );
                }
            }
            Ok(())
        }

        ConsignmentCommands::Workflows { hs_code, flow } => {
            let workflows = client.workflows_for_hs_code(&hs_code).await?;
            if let OutputFormat::Json = format {
                return print_json(&workflows);
            }

            let flows = match flow {
                Some(flow) => vec![flow],
                None => vec![TradeFlow::Import, TradeFlow::Export],
            };
            for flow in flows {
                println!("{}", paint(flow.as_str(), flow.color()).bold());
                let templates = workflows.for_flow(flow);
                if templates.is_empty() {
                    println!("  {}", "No workflows".dimmed());
                }
                for workflow in templates {
                    println!("  {} {} ({} steps)", workflow.id.cyan(), workflow.name, workflow.steps.len());
                }
            }
            Ok(())
        }

        ConsignmentCommands::Create {
            flow,
            hs_code,
            workflow,
        } => {
            let workflow_id = match workflow {
                Some(id) => id,
                None => {
                    let workflows = client.workflows_for_hs_code(&hs_code).await?;
                    match workflows.for_flow(flow).first() {
                        Some(w) => w.id.clone(),
                        None => bail!("No {} workflow for HS code {}", flow.as_str(), hs_code),
                    }
                }
            };

            let request = CreateConsignmentRequest::new(flow, &settings.trader_id)
                .with_item(&hs_code, &workflow_id);
            let created = client.create_consignment(&request).await?;
            print_success(&format!("Consignment {} created", created.id));
            Ok(())
        }
    }
}

fn print_consignment(consignment: &Consignment) {
    println!("Consignment: {}", consignment.id.bold());
    println!(
        "Flow: {}",
        paint(consignment.trade_flow.as_str(), consignment.trade_flow.color())
    );
    println!(
        "State: {}",
        paint(&consignment.state.label(), consignment.state.color())
    );
    println!("Trader: {}", consignment.trader_id);
    for item in &consignment.items {
        println!("HS code: {} ({} steps)", item.hs_code_id, item.steps.len());
    }
    println!("Created: {}", consignment.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", consignment.updated_at.format("%Y-%m-%d %H:%M"));
}

/// Table row for consignment display
#[derive(Debug, Serialize, Tabled)]
struct ConsignmentRow {
    id: String,
    #[tabled(rename = "hs code")]
    hs_code: String,
    flow: String,
    state: String,
    steps: String,
    created: String,
}

impl From<Consignment> for ConsignmentRow {
    fn from(c: Consignment) -> Self {
        let total = c.steps().count();
        let done = c
            .steps()
            .filter(|s| s.status == portal_types::StepStatus::Completed)
            .count();

        Self {
            id: short_id(&c.id),
            hs_code: c.primary_hs_code().unwrap_or("-").to_string(),
            flow: c.trade_flow.as_str().to_string(),
            state: c.state.label(),
            steps: format!("{}/{}", done, total),
            created: c.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use portal_types::{ConsignmentItem, ConsignmentState, StepStatus, StepType, WorkflowStep};

    #[test]
    fn test_row_counts_completed_steps() {
        let created = chrono::Utc.with_ymd_and_hms(2026, 1, 16, 14, 30, 0).unwrap();
        let consignment = Consignment {
            id: "0f8d2c5e-1b7a-4c1e".into(),
            trade_flow: TradeFlow::Import,
            trader_id: "trader-123".into(),
            state: ConsignmentState::RequiresRework,
            items: vec![ConsignmentItem {
                hs_code_id: "0902.30".into(),
                steps: vec![
                    WorkflowStep::new("a", StepType::TraderForm, StepStatus::Completed),
                    WorkflowStep::new("b", StepType::OgaForm, StepStatus::Rejected).depends_on("a"),
                ],
            }],
            created_at: created,
            updated_at: created,
        };

        let row = ConsignmentRow::from(consignment);
        assert_eq!(row.id, "0f8d2c5e...");
        assert_eq!(row.hs_code, "0902.30");
        assert_eq!(row.state, "Requires Rework");
        assert_eq!(row.steps, "1/2");
        assert_eq!(row.created, "2026-01-16");
    }
}
