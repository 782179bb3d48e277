//! Portal CLI - terminal driver for the trade portals
//!
//! Traders can list consignments, inspect workflow graphs and fill in task
//! forms; officers can review and approve applications. Forms are rendered
//! and validated with the same engine the portals use.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{config, consignments, hscodes, layout, review, task};
use portal_client::PortalClient;
use portal_config::PortalSettings;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Trade portal CLI: consignments, workflows and OGA reviews", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file path
    #[arg(short, long, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,

    /// API base URL (overrides settings)
    #[arg(long)]
    api_url: Option<String>,

    /// Deployment instance for review forms (overrides settings)
    #[arg(short, long)]
    instance: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse consignments
    Consignments {
        #[command(subcommand)]
        command: consignments::ConsignmentCommands,
    },

    /// Search HS codes
    Hscodes(hscodes::HsCodeArgs),

    /// Lay out a workflow graph
    Layout(layout::LayoutArgs),

    /// Fill in and submit a trader task form
    Task(task::TaskArgs),

    /// List OGA applications
    Applications(review::ApplicationsArgs),

    /// Review an OGA application
    Review(review::ReviewArgs),

    /// Approve or reject an OGA application
    Approve(review::ApproveArgs),

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let mut settings = PortalSettings::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(instance) = cli.instance {
        settings.instance = Some(instance);
    }

    let client = PortalClient::new(&settings.api_base_url, settings.timeout())?;

    match cli.command {
        Commands::Consignments { command } => {
            consignments::execute(command, &client, &settings, cli.output).await
        }
        Commands::Hscodes(args) => hscodes::execute(args, &client, cli.output).await,
        Commands::Layout(args) => layout::execute(args, &client, cli.output).await,
        Commands::Task(args) => task::execute(args, &client, &settings).await,
        Commands::Applications(args) => review::execute_applications(args, &client, cli.output).await,
        Commands::Review(args) => review::execute_review(args, &client, &settings).await,
        Commands::Approve(args) => review::execute_approve(args, &client, &settings).await,
        Commands::Config { command } => config::execute(command, &settings, cli.output),
    }
}
