//! Trader task forms

use crate::commands::form::{
    apply_assignments, attach_files, parse_assignment, print_form, report_outcome, Assignment,
};
use crate::output::{print_info, print_warning};
use anyhow::bail;
use clap::Args;
use form_engine::{FormDefinition, FormEngine, SampleData};
use portal_client::{HttpFileStore, PortalClient, TaskSubmitHandler};
use portal_config::PortalSettings;
use std::sync::Arc;

#[derive(Args)]
pub struct TaskArgs {
    /// Consignment the task belongs to
    consignment_id: String,

    /// Task ID
    task_id: String,

    /// Set a field, e.g. --set consigneeName=Acme
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    values: Vec<Assignment>,

    /// Attach a file, e.g. --file certificate=./cert.pdf
    #[arg(short, long = "file", value_parser = parse_assignment)]
    files: Vec<Assignment>,

    /// Save as a draft instead of submitting
    #[arg(long)]
    draft: bool,

    /// Fill empty fields from sample data
    #[arg(long)]
    autofill: bool,

    /// Print the filled form without sending it
    #[arg(long)]
    preview: bool,
}

pub async fn execute(args: TaskArgs, client: &PortalClient, settings: &PortalSettings) -> anyhow::Result<()> {
    let response = client
        .fetch_task_form(&args.task_id, &args.consignment_id)
        .await?;
    let result = match (response.success, response.result) {
        (true, Some(result)) => result,
        (_, _) => {
            let message = response
                .error
                .map(|e| format!("{} ({})", e.message, e.code))
                .unwrap_or_else(|| "Task form unavailable".to_string());
            bail!("Cannot load task {}: {}", args.task_id, message);
        }
    };

    let form = result.data.clone();
    let definition = FormDefinition::from_json(form.schema, form.ui_schema)?;

    let mut handler = TaskSubmitHandler::new(client.clone(), &args.task_id, &args.consignment_id);
    if args.draft {
        handler = handler.as_draft();
    }
    let mut engine = FormEngine::new(definition, Arc::new(handler))
        .with_initial_values(form.form_data)
        .with_uploader(Arc::new(HttpFileStore::new(client.clone())));

    let title = if form.title.is_empty() {
        format!("Task {}", args.task_id)
    } else {
        form.title
    };

    if result.is_read_only() {
        engine = engine.read_only();
        print_form(&engine, &title)?;
        print_info(&format!("Task is {} and cannot be edited", result.status));
        if !args.values.is_empty() || !args.files.is_empty() {
            print_warning("Ignoring --set and --file on a read-only task");
        }
        return Ok(());
    }

    if args.autofill || settings.autofill {
        let filled = engine.auto_fill(&SampleData::builtin(), 0, false);
        print_info(&format!("Filled {} field(s) from sample data", filled));
    }
    apply_assignments(&engine, &args.values)?;
    attach_files(&engine, &args.files)?;

    print_form(&engine, &title)?;
    if args.preview {
        return Ok(());
    }

    let what = if args.draft { "Draft" } else { "Task form" };
    let outcome = engine.handle_submit().await;
    report_outcome(&engine, outcome, what)
}
