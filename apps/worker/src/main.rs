mod config;
mod db;
mod errors;
mod generation;
mod job;
mod llm_client;
mod models;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Cli, Config, EnvOverrides, RunConfig};
use crate::db::create_pool;
use crate::job::run_once;
use crate::llm_client::GeminiClient;
use crate::store::postgres::PgTopicStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting topic worker v{}", env!("CARGO_PKG_VERSION"));

    // Resolve the run parameters before touching anything external
    let cli = Cli::parse();
    let run = match RunConfig::resolve(&cli, &EnvOverrides::from_env()) {
        Ok(run) => run,
        Err(e) => {
            error!("Run aborted in {}: {e}", e.stage());
            return Err(e.into());
        }
    };
    info!(
        "Run parameters: {} topics, focus {}, model {}",
        run.num_topics, run.difficulty_focus, run.model_name
    );

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store = PgTopicStore::new(pool);
    store.ensure_schema().await?;

    // Initialize the model client
    let model = GeminiClient::new(config.gemini_api_key.clone(), run.model_name.clone());
    info!("Gemini client initialized (model: {})", run.model_name);

    // One generation run, one persisted document
    match run_once(&run, &model, &store).await {
        Ok(summary) => {
            info!(
                "Run {} complete: persisted {}/{} topics ({} candidates rejected)",
                summary.run_id, summary.persisted, summary.requested, summary.rejected
            );
            Ok(())
        }
        Err(e) => {
            error!("Run aborted in {}: {e}", e.stage());
            Err(e.into())
        }
    }
}
