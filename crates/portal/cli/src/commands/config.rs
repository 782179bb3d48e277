//! Configuration commands

use crate::output::{print_error, print_json, print_output, OutputFormat};
use clap::Subcommand;
use colored::*;
use portal_config::{builtin_instances, instances_in_dir, InstanceConfig, PortalSettings};
use serde::Serialize;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings and selected instance
    Show,

    /// List available instances
    Instances,

    /// Print the settings file location
    Path,
}

pub fn execute(command: ConfigCommands, settings: &PortalSettings, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            if let OutputFormat::Json = format {
                return print_json(settings);
            }

            println!("API:       {}", settings.api_base_url.cyan());
            println!("Trader:    {}", settings.trader_id);
            println!("Reviewer:  {}", settings.reviewer_name);
            println!("Autofill:  {}", settings.autofill);
            println!("Timeout:   {}s", settings.timeout_secs);
            match &settings.instance_dir {
                Some(dir) => println!("Instances: {}", dir.display()),
                None => println!("Instances: {}", "built-in".dimmed()),
            }

            match settings.instance {
                None => println!("Instance:  {}", "none".dimmed()),
                Some(_) => match settings.load_instance() {
                    Ok(instance) => print_instance(&instance),
                    Err(err) => print_error(&err.to_string()),
                },
            }
            Ok(())
        }

        ConfigCommands::Instances => {
            let ids = match &settings.instance_dir {
                Some(dir) => instances_in_dir(dir)?,
                None => builtin_instances().into_iter().map(String::from).collect(),
            };
            let rows: Vec<InstanceRow> = ids
                .into_iter()
                .map(|id| InstanceRow {
                    selected: if settings.instance.as_deref() == Some(id.as_str()) {
                        "*".to_string()
                    } else {
                        String::new()
                    },
                    id,
                })
                .collect();
            print_output(rows, format)
        }

        ConfigCommands::Path => {
            println!("{}", PortalSettings::default_path()?.display());
            Ok(())
        }
    }
}

fn print_instance(instance: &InstanceConfig) {
    println!("Instance:  {} ({})", instance.id.bold(), instance.branding.app_name);
    println!("Review forms:");
    for form in instance.review_forms() {
        let marker = if form.review_document_id == instance.default_form_id {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} - {} fields{}",
            form.review_document_id.cyan(),
            form.review_type,
            form.definition.controls().len(),
            marker
        );
    }
}

#[derive(Debug, Serialize, Tabled)]
struct InstanceRow {
    id: String,
    selected: String,
}
