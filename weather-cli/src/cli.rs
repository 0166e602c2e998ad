use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use weather_core::{
    Config, Pipeline, QualityGate, QualityReport, RunOutcome, WeatherStore,
    notify::render_summary,
    provider::provider_from_config,
    store::{MemoryStore, PgWeatherStore},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-etl", version, about = "Hourly QWeather → PostgreSQL ETL")]
pub struct Cli {
    /// Debug-level logs with source locations.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, transform, validate and load readings for all configured cities.
    Run {
        /// Keep records in memory instead of writing to PostgreSQL.
        #[arg(long)]
        dry_run: bool,
    },

    /// Fail unless every configured city has rows in the recent window.
    Check {
        /// Look-back window; defaults to one hour.
        #[arg(long)]
        window_minutes: Option<i64>,
    },

    /// Run the ETL, then the quality check, then print the success summary.
    All,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::from_env().context("Invalid configuration")?;
        info!(cities = config.cities.len(), "Configuration loaded");

        match self.command {
            Command::Run { dry_run } => {
                let store = open_store(&config, dry_run).await?;
                run_etl(&config, store).await?;
            }
            Command::Check { window_minutes } => {
                let store = open_store(&config, false).await?;
                let window = window_minutes.unwrap_or(config.quality_window_minutes);
                check_quality(&config, store, window).await?;
            }
            Command::All => {
                let store = open_store(&config, false).await?;
                let outcome = run_etl(&config, Arc::clone(&store)).await?;
                let report = check_quality(&config, store, config.quality_window_minutes).await?;

                let today = chrono::Utc::now().date_naive();
                let summary = render_summary(today, &outcome, Some(&report));
                println!("Subject: {}\n\n{}", summary.subject, summary.html);
            }
        }

        Ok(())
    }
}

async fn open_store(config: &Config, dry_run: bool) -> anyhow::Result<Arc<dyn WeatherStore>> {
    if dry_run {
        info!("Dry run: records are kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgWeatherStore::connect(&config.database)
        .await
        .with_context(|| format!("Failed to connect to PostgreSQL at {}", config.database.host))?;
    Ok(Arc::new(store))
}

async fn run_etl(config: &Config, store: Arc<dyn WeatherStore>) -> anyhow::Result<RunOutcome> {
    let provider = provider_from_config(config)?;
    let pipeline = Pipeline::new(provider, store, config.cities.clone());

    pipeline.run().await.context("ETL pipeline failed")
}

async fn check_quality(
    config: &Config,
    store: Arc<dyn WeatherStore>,
    window_minutes: i64,
) -> anyhow::Result<QualityReport> {
    let window = quality_window(window_minutes)?;

    let gate = QualityGate::new(store, config.city_names(), window);
    gate.check().await.context("Data quality check failed")
}

fn quality_window(window_minutes: i64) -> anyhow::Result<chrono::Duration> {
    anyhow::ensure!(window_minutes > 0, "--window-minutes must be positive");

    chrono::Duration::try_minutes(window_minutes)
        .with_context(|| format!("--window-minutes {window_minutes} is too large"))
}
