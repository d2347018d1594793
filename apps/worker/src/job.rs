//! One run of the worker, end to end.
//!
//! Flow: generate_topics → RunDocument → TopicStore::insert_run.
//! A successful run writes exactly one document; a failed run writes nothing.

use tracing::info;

use crate::config::RunConfig;
use crate::errors::JobError;
use crate::generation::generator::generate_topics;
use crate::llm_client::TopicModel;
use crate::models::topic::RunDocument;
use crate::store::TopicStore;

/// What one finished run reports to the outcome log.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: String,
    pub persisted: usize,
    pub requested: u32,
    pub rejected: usize,
}

/// Executes a single generate-and-persist run.
pub async fn run_once(
    run: &RunConfig,
    model: &dyn TopicModel,
    store: &dyn TopicStore,
) -> Result<RunSummary, JobError> {
    let report = generate_topics(model, run).await?;

    let document = RunDocument::new(run.model_name.clone(), report.topics);
    info!(
        "Persisting run {} ({} topics, model {})",
        document.run_id,
        document.topics.len(),
        document.model
    );
    store.insert_run(&document).await?;

    Ok(RunSummary {
        run_id: document.run_id,
        persisted: document.topics.len(),
        requested: report.requested,
        rejected: report.rejected,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
