//! OGA officer commands: list, review and decide applications

use crate::commands::form::{
    apply_assignments, parse_assignment, print_form, report_outcome, Assignment,
};
use crate::output::{paint, print_info, print_output, print_warning, short_id, OutputFormat};
use anyhow::{anyhow, Context};
use clap::Args;
use colored::*;
use form_engine::{FieldPath, FormEngine, SampleData, SubmitHandler};
use portal_client::{ApprovalSubmitHandler, PortalClient, ReviewSubmitHandler};
use portal_config::PortalSettings;
use portal_types::{ApplicationQuery, Decision, OgaApplication};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;

const DECISION_FIELD: &str = "decision";

#[derive(Args)]
pub struct ApplicationsArgs {
    /// Filter by status, e.g. PENDING
    #[arg(short, long)]
    status: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<u32>,

    /// Page size
    #[arg(long, default_value = "20")]
    page_size: u32,
}

#[derive(Args)]
pub struct ReviewArgs {
    /// Task ID of the application
    task_id: String,

    /// Set a review field, e.g. --set decision=APPROVED
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    values: Vec<Assignment>,

    /// Fill empty review fields from sample data
    #[arg(long)]
    autofill: bool,

    /// Print the filled review form without sending it
    #[arg(long)]
    preview: bool,
}

#[derive(Args)]
pub struct ApproveArgs {
    /// Task ID of the application
    task_id: String,

    /// APPROVED or REJECTED
    #[arg(short, long)]
    decision: Decision,

    /// Comments for the trader
    #[arg(short, long)]
    comments: Option<String>,

    /// Set a review field, e.g. --set remarks=Cleared
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    values: Vec<Assignment>,

    /// Reviewer name (defaults to the configured reviewer)
    #[arg(long)]
    reviewer: Option<String>,
}

pub async fn execute_applications(
    args: ApplicationsArgs,
    client: &PortalClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut query = ApplicationQuery::default();
    if let Some(status) = args.status {
        query = query.with_status(status.to_ascii_uppercase());
    }
    if let Some(page) = args.page {
        query = query.with_page(page, args.page_size);
    }

    let page = client.list_applications(&query).await?;
    let more = page.has_more();
    let rows: Vec<ApplicationRow> = page.items.into_iter().map(Into::into).collect();
    print_output(rows, format)?;
    if more {
        if let OutputFormat::Table = format {
            print_info("More applications available; use --page");
        }
    }
    Ok(())
}

pub async fn execute_review(
    args: ReviewArgs,
    client: &PortalClient,
    settings: &PortalSettings,
) -> anyhow::Result<()> {
    let application = fetch_application(client, &args.task_id).await?;
    print_application(&application);

    let handler = ReviewSubmitHandler::new(client.clone(), &args.task_id);
    let engine = review_engine(settings, &application, Arc::new(handler))?;
    if !application.status.is_reviewable() {
        let engine = engine.read_only();
        print_form(&engine, "Review")?;
        print_warning(&format!("Application is already {}", application.status));
        return Ok(());
    }

    if args.autofill || settings.autofill {
        engine.auto_fill(&SampleData::builtin(), 0, false);
    }
    apply_assignments(&engine, &args.values)?;
    print_form(&engine, "Review")?;
    if args.preview {
        return Ok(());
    }

    let outcome = engine.handle_submit().await;
    report_outcome(&engine, outcome, "Review")
}

pub async fn execute_approve(
    args: ApproveArgs,
    client: &PortalClient,
    settings: &PortalSettings,
) -> anyhow::Result<()> {
    let application = fetch_application(client, &args.task_id).await?;
    if !application.status.is_reviewable() {
        anyhow::bail!("Application {} is already {}", args.task_id, application.status);
    }
    let consignment_id = application
        .consignment()
        .ok_or_else(|| anyhow!("Application {} has no consignment", args.task_id))?
        .to_string();

    let reviewer = args.reviewer.as_deref().unwrap_or(&settings.reviewer_name);
    let mut handler = ApprovalSubmitHandler::new(
        client.clone(),
        &args.task_id,
        consignment_id,
        args.decision,
        reviewer,
    )
    .with_trader_data(application.data.clone());
    if let Some(comments) = args.comments {
        handler = handler.with_comments(comments);
    }

    let engine = review_engine(settings, &application, Arc::new(handler))?;
    apply_assignments(&engine, &with_decision(&engine, args.decision, args.values))?;

    let outcome = engine.handle_submit().await;
    let what = match args.decision {
        Decision::Approved => "Approval",
        Decision::Rejected => "Rejection",
    };
    report_outcome(&engine, outcome, what)
}

async fn fetch_application(client: &PortalClient, task_id: &str) -> anyhow::Result<OgaApplication> {
    client
        .get_application(task_id)
        .await?
        .ok_or_else(|| anyhow!("Application not found: {}", task_id))
}

/// Engine over the instance's review form for this application
fn review_engine(
    settings: &PortalSettings,
    application: &OgaApplication,
    handler: Arc<dyn SubmitHandler>,
) -> anyhow::Result<FormEngine> {
    let instance = settings.load_instance()?;
    let form = instance
        .review_form(application.verification_id())
        .with_context(|| format!("No review form for application {}", application.task_id))?;
    tracing::debug!(
        instance = %instance.id,
        form_id = %form.review_document_id,
        "Using review form"
    );
    Ok(FormEngine::new(form.definition.clone(), handler))
}

/// Prefill a `decision` field from `--decision` unless it is set explicitly
fn with_decision(engine: &FormEngine, decision: Decision, mut values: Vec<Assignment>) -> Vec<Assignment> {
    let has_field = FieldPath::parse(DECISION_FIELD)
        .map(|path| engine.definition().is_known_path(&path))
        .unwrap_or(false);
    if has_field && !values.iter().any(|a| a.field == DECISION_FIELD) {
        let wire = match decision {
            Decision::Approved => "APPROVED",
            Decision::Rejected => "REJECTED",
        };
        values.insert(
            0,
            Assignment {
                field: DECISION_FIELD.to_string(),
                value: wire.to_string(),
            },
        );
    }
    values
}

fn print_application(application: &OgaApplication) {
    println!("Application: {}", application.task_id.bold());
    println!(
        "Status: {}",
        paint(application.status.as_str(), application.status.color())
    );
    if let Some(consignment) = application.consignment() {
        println!("Consignment: {}", consignment);
    }
    if let Some(created) = application.created_at {
        println!("Submitted: {}", created.format("%Y-%m-%d %H:%M"));
    }
    if let Some(reviewed) = application.reviewed_at {
        println!("Reviewed: {}", reviewed.format("%Y-%m-%d %H:%M"));
    }
    if let Some(notes) = &application.reviewer_notes {
        println!("Notes: {}", notes.italic());
    }

    let entries = application.data_entries();
    if entries.is_empty() {
        println!("{}", "No submitted data".dimmed());
    } else {
        println!("\nSubmitted data:");
        for (field, value) in entries {
            println!("  {}: {}", field.dimmed(), value);
        }
    }
    println!();
}

/// Table row for application display
#[derive(Debug, Serialize, Tabled)]
struct ApplicationRow {
    task: String,
    consignment: String,
    form: String,
    status: String,
    submitted: String,
}

impl From<OgaApplication> for ApplicationRow {
    fn from(a: OgaApplication) -> Self {
        Self {
            task: a.task_id.clone(),
            consignment: a.consignment().map(short_id).unwrap_or_else(|| "-".into()),
            form: a.verification_id().or(a.form_id.as_deref()).unwrap_or("-").to_string(),
            status: a.status.as_str().to_string(),
            submitted: a
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn application(meta: serde_json::Value) -> OgaApplication {
        serde_json::from_value(json!({
            "taskId": "t-2",
            "workflowId": "c-1",
            "formId": "legacy-form",
            "status": "PENDING",
            "data": {"netWeight": 5000},
            "meta": meta
        }))
        .unwrap()
    }

    fn settings(instance: &str) -> PortalSettings {
        PortalSettings {
            instance: Some(instance.into()),
            ..PortalSettings::default()
        }
    }

    #[test]
    fn test_row_prefers_verification_id() {
        let row = ApplicationRow::from(application(json!({"verificationId": "moa:npqs:phytosanitary:002"})));
        assert_eq!(row.form, "moa:npqs:phytosanitary:002");
        assert_eq!(row.consignment, "c-1");
        assert_eq!(row.submitted, "-");

        let row = ApplicationRow::from(application(serde_json::Value::Null));
        assert_eq!(row.form, "legacy-form");
    }

    #[test]
    fn test_review_engine_uses_instance_default_form() {
        let handler = Arc::new(ReviewSubmitHandler::new(
            PortalClient::new("http://localhost:1", std::time::Duration::from_secs(1)).unwrap(),
            "t-2",
        ));
        let engine = review_engine(&settings("npqs"), &application(serde_json::Value::Null), handler).unwrap();
        assert!(!engine.controls().is_empty());
    }

    #[test]
    fn test_decision_prefilled_unless_set() {
        let handler = Arc::new(ReviewSubmitHandler::new(
            PortalClient::new("http://localhost:1", std::time::Duration::from_secs(1)).unwrap(),
            "t-2",
        ));
        let engine = review_engine(&settings("fcau"), &application(serde_json::Value::Null), handler).unwrap();

        let values = with_decision(&engine, Decision::Rejected, Vec::new());
        assert_eq!(values[0].value, "REJECTED");

        let explicit = vec![parse_assignment("decision=NEEDS_MORE_INFO").unwrap()];
        let values = with_decision(&engine, Decision::Approved, explicit.clone());
        assert_eq!(values, explicit);
    }

    #[test]
    fn test_review_engine_unknown_form() {
        let handler = Arc::new(ReviewSubmitHandler::new(
            PortalClient::new("http://localhost:1", std::time::Duration::from_secs(1)).unwrap(),
            "t-2",
        ));
        let result = review_engine(
            &settings("npqs"),
            &application(json!({"verificationId": "moh:unknown"})),
            handler,
        );
        assert!(result.is_err());
    }
}
