// Run persistence
// One document per run behind the TopicStore trait. Production writes to
// Postgres; unit tests persist into memory.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::topic::RunDocument;

pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a run with id '{0}' already exists")]
    DuplicateRun(String),

    #[error("refusing to persist a run with no topics")]
    EmptyRun,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where finished runs go.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Inserts a run document as a unit. Fails with `DuplicateRun` when the
    /// id is already taken; an existing run is never overwritten.
    async fn insert_run(&self, document: &RunDocument) -> Result<(), StoreError>;

    /// Looks up a single run by id.
    async fn fetch_run(&self, run_id: &str) -> Result<Option<RunDocument>, StoreError>;

    /// Returns the most recent runs, newest first.
    async fn recent_runs(&self, limit: i64) -> Result<Vec<RunDocument>, StoreError>;
}
