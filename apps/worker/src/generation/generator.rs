//! Topic generation — orchestrates the single model call of a run.
//!
//! Flow: build prompts → model call → strip fences → parse JSON array →
//!       validate each candidate → GenerationReport.
//!
//! Validation failures are per-candidate: each one is logged and counted,
//! and the run only fails when no candidate survives.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::generation::prompts::{build_system_prompt, build_user_prompt};
use crate::generation::validation::validate_candidate;
use crate::llm_client::{GenerationRequest, LlmError, TopicModel};
use crate::models::topic::TopicRecord;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("model returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("no valid topics among {received} candidates ({rejected} rejected)")]
    NoValidTopics { received: usize, rejected: usize },
}

/// Outcome of one generation pass, with the counts the run log reports.
#[derive(Debug)]
pub struct GenerationReport {
    pub topics: Vec<TopicRecord>,
    pub requested: u32,
    pub received: usize,
    pub rejected: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one generation pass: a single model call followed by per-candidate
/// validation.
///
/// Steps:
/// 1. Build the system and user prompts from the run config.
/// 2. One `TopicModel::generate` call (the client retries transient failures).
/// 3. Parse the response as a JSON array of candidate objects.
/// 4. Validate each candidate; log and drop the ones that fail.
/// 5. Error if nothing survived, otherwise cap at the requested count.
pub async fn generate_topics(
    model: &dyn TopicModel,
    run: &RunConfig,
) -> Result<GenerationReport, GenerationError> {
    info!(
        "Requesting {} topics from model {} (focus: {})",
        run.num_topics, run.model_name, run.difficulty_focus
    );

    let request = GenerationRequest::new(build_system_prompt(), build_user_prompt(run));
    let raw = model.generate(&request).await?;

    let candidates = parse_candidates(&raw)?;
    let received = candidates.len();

    let mut topics = Vec::new();
    let mut rejected = 0usize;
    for (index, candidate) in candidates.iter().enumerate() {
        match validate_candidate(candidate) {
            Ok(record) => topics.push(record),
            Err(reason) => {
                rejected += 1;
                warn!("Dropping candidate {}: {}", index + 1, reason);
            }
        }
    }

    info!(
        "Validated {}/{} candidates ({} rejected)",
        topics.len(),
        received,
        rejected
    );

    if topics.is_empty() {
        return Err(GenerationError::NoValidTopics { received, rejected });
    }

    // Over-delivery is surplus, not a defect: keep the first `num_topics`.
    topics.truncate(run.num_topics as usize);

    Ok(GenerationReport {
        topics,
        requested: run.num_topics,
        received,
        rejected,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

/// Parses the raw model text into candidate objects. Tolerates code fences
/// and surrounding prose; anything without a parseable JSON array inside is
/// malformed.
fn parse_candidates(raw: &str) -> Result<Vec<Value>, GenerationError> {
    let text = strip_json_fences(raw);

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        return Ok(items);
    }

    // Some models wrap the array in prose despite instructions. Retry on the
    // outermost bracketed slice before giving up.
    if let Some(slice) = extract_json_array(text) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(slice) {
            return Ok(items);
        }
    }

    Err(GenerationError::MalformedResponse(
        text.chars().take(120).collect(),
    ))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Finds the outermost `[ ... ]` slice in free text.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
