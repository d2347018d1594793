//! Domain models for one generation run: the topic record and the persisted
//! run document. Field names on the wire and in the store are camelCase
//! (`runId`, `keyPoints`, `durationMinutes`), matching the document shape the
//! reporting side reads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty level of an interview topic. Serialized as the lowercase
/// keyword (`junior`, `mid-level`, `senior`, `staff`) everywhere: prompts,
/// model output, persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Junior,
    MidLevel,
    Senior,
    Staff,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Junior,
        Difficulty::MidLevel,
        Difficulty::Senior,
        Difficulty::Staff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Junior => "junior",
            Difficulty::MidLevel => "mid-level",
            Difficulty::Senior => "senior",
            Difficulty::Staff => "staff",
        }
    }

    /// Experience band shown to the model when listing the levels.
    pub fn describe(self) -> &'static str {
        match self {
            Difficulty::Junior => "Entry-level (0-2 years experience)",
            Difficulty::MidLevel => "Experienced developer (3-5 years experience)",
            Difficulty::Senior => "Senior engineer (6+ years experience)",
            Difficulty::Staff => "Staff/Principal engineer (8+ years experience)",
        }
    }

    /// Parses the lowercase keyword form. Returns `None` for anything else;
    /// callers decide whether that is a config error or a rejected candidate.
    pub fn from_keyword(s: &str) -> Option<Difficulty> {
        match s {
            "junior" => Some(Difficulty::Junior),
            "mid-level" => Some(Difficulty::MidLevel),
            "senior" => Some(Difficulty::Senior),
            "staff" => Some(Difficulty::Staff),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated interview topic. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub key_points: Vec<String>,
    pub duration_minutes: u32,
    pub technologies: Vec<String>,
}

/// The persisted unit: all topics from one run plus run metadata.
/// Written once, never updated or deleted by this job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDocument {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub topics: Vec<TopicRecord>,
}

impl RunDocument {
    /// Assembles the document for a finished run, stamping `generated_at`
    /// and deriving a fresh `run_id`.
    pub fn new(model: impl Into<String>, topics: Vec<TopicRecord>) -> Self {
        let now = Utc::now();
        Self {
            run_id: new_run_id(now),
            generated_at: now,
            model: model.into(),
            topics,
        }
    }
}

/// Derives a run id from the UTC date plus an opaque suffix, e.g.
/// `20260311-3fa9c21b`. The date prefix keeps scheduler logs and ad-hoc
/// queries readable; the suffix keeps concurrent runs on the same day from
/// colliding.
pub fn new_run_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.format("%Y%m%d"), &suffix[..8])
}
