use thiserror::Error;

use crate::generation::generator::GenerationError;
use crate::store::StoreError;

/// Top-level error for one worker run.
/// Any variant makes the process exit non-zero; the variant says which stage
/// gave up.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl JobError {
    /// Stage label for the final outcome log line.
    pub fn stage(&self) -> &'static str {
        match self {
            JobError::Config(_) => "configuration",
            JobError::Generation(_) => "generation",
            JobError::Persistence(_) => "persistence",
        }
    }
}
