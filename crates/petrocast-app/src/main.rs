//! Petrocast command-line entry point.
//!
//! `fetch` and `train` are the offline batch jobs; `serve` hosts the
//! forecast API. Batch errors abort the run so no partial artifacts are
//! published; re-running the command is the recovery action.

use std::fs;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use petrocast_core::{clean, fit, read_panel, write_panel, Panel};

use petrocast_app::config::AppConfig;
use petrocast_app::{fetch, server, service};

#[derive(Parser)]
#[command(name = "petrocast")]
#[command(about = "Oil production forecasting pipeline and dashboard API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the remote indicators, clean the panel, and write the data file
    Fetch,
    /// Fit the ARIMA model on the stored panel and write the model artifact
    Train,
    /// Serve the forecast API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::from_env();

    let result = match cli.command {
        Commands::Fetch => run_fetch(&cfg),
        Commands::Train => run_train(&cfg),
        Commands::Serve { bind } => run_serve(&cfg, &bind),
    };

    if let Err(err) = result {
        error!(error = %err, "command failed");
        process::exit(1);
    }
}

/// Fetch -> align -> clean -> write. The panel file is only written after
/// cleaning succeeds.
fn run_fetch(cfg: &AppConfig) -> Result<()> {
    if cfg.api_token.is_empty() {
        warn!("ECONDB_TOKEN is not set; the series source will likely reject requests");
    }

    let series = fetch::fetch_all(cfg);
    let panel = Panel::align(&series);
    info!(rows = panel.n_rows(), columns = panel.n_cols(), "aligned panel");

    let cleaned = clean(&panel, &cfg.clean)?;
    fs::create_dir_all(&cfg.data_dir)?;
    write_panel(&cleaned, &cfg.panel_path())?;
    info!(
        rows = cleaned.n_rows(),
        path = %cfg.panel_path().display(),
        "panel written"
    );
    Ok(())
}

/// Read the stored panel, fit the fixed-order model, write the artifact.
fn run_train(cfg: &AppConfig) -> Result<()> {
    let panel = read_panel(&cfg.panel_path())?;
    let (dates, values) = panel.observed(&cfg.clean.target_column)?;
    let last_observed = dates
        .last()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("panel has no target observations"))?;

    let model = fit(&values, cfg.order, &cfg.clean.target_column, last_observed)?;
    info!(
        order = %model.order,
        aic = model.report.aic,
        rmse = model.report.rmse,
        "model fitted"
    );

    fs::create_dir_all(&cfg.data_dir)?;
    model.save(&cfg.model_path())?;
    info!(path = %cfg.model_path().display(), "model artifact written");
    Ok(())
}

/// Load the serving state once, then answer requests until stopped.
fn run_serve(cfg: &AppConfig, bind: &str) -> Result<()> {
    let service = Arc::new(service::ForecastService::load(cfg)?);
    info!(last_observed = %service.last_observed(), "forecast service loaded");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(service, bind))
}
