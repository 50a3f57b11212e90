use anyhow::Context;
use clap::{Parser, Subcommand};
use defect_pulse::api::{DefectApi, HttpDefectApi};
use defect_pulse::app::{handle_fatal_error, init_logging, DashboardConfig};
use defect_pulse::dashboard::{OverviewLoader, RiskFilter};
use defect_pulse::model::ProjectId;
use defect_pulse::orchestrator::{ApplyOutcome, DashboardState, MetricsFetchOrchestrator};
use defect_pulse::risk::RiskClassifier;
use defect_pulse::view::ProjectView;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Project risk overview and per-project defect metrics
#[derive(Parser)]
#[command(name = "defect-pulse")]
#[command(about = "Defect-tracking dashboard metrics from the command line", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects with their risk tier and tier counts
    Projects {
        /// Only show projects of this tier (all, high, medium, low)
        #[arg(long, default_value = "all")]
        risk: RiskFilter,
    },
    /// Fetch every metric of one project with its chart geometry
    Metrics {
        /// Project id
        project_id: ProjectId,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    init_logging(&config);

    let result = run(cli.command, &config).await;
    if let Err(e) = result {
        handle_fatal_error(e, config.verbose);
    }
}

async fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref()).await?;
    config.verbose = config.verbose.max(cli.verbose);
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

async fn run(command: Commands, config: &DashboardConfig) -> anyhow::Result<()> {
    let api: Arc<dyn DefectApi> = Arc::new(HttpDefectApi::new(
        &config.base_url,
        config.request_timeout(),
    )?);
    debug!("Using service at {}", config.base_url);

    match command {
        Commands::Projects { risk } => run_projects(api, config, risk).await,
        Commands::Metrics { project_id } => run_metrics(api, config, project_id).await,
    }
}

async fn run_projects(
    api: Arc<dyn DefectApi>,
    config: &DashboardConfig,
    risk: RiskFilter,
) -> anyhow::Result<()> {
    let loader = OverviewLoader::new(api, RiskClassifier::new(config.unknown_color_policy))
        .with_empty_sentinels(config.empty_sentinels.clone());
    let overview = loader.load().await.context("Failed to load projects")?;

    let output = json!({
        "loaded_at": overview.loaded_at,
        "counts": overview.counts(),
        "filter": risk,
        "projects": overview.filter(risk),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_metrics(
    api: Arc<dyn DefectApi>,
    config: &DashboardConfig,
    project_id: ProjectId,
) -> anyhow::Result<()> {
    let orchestrator =
        MetricsFetchOrchestrator::new(api).with_empty_sentinels(config.empty_sentinels.clone());
    let mut state = DashboardState::new();

    if orchestrator.refresh(&mut state, project_id).await == ApplyOutcome::Stale {
        anyhow::bail!("Metrics for project {project_id} were superseded");
    }
    let bundle = state
        .bundle(project_id)
        .with_context(|| format!("No metrics recorded for project {project_id}"))?;

    let output = json!({
        "project_id": project_id,
        "metrics": bundle,
        "charts": ProjectView::from_bundle(bundle),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
