use std::fmt;

use anyhow::{Context, Result};
use clap::Parser;

use crate::errors::JobError;
use crate::models::topic::Difficulty;

pub const DEFAULT_NUM_TOPICS: u32 = 15;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Process configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

// ────────────────────────────────────────────────────────────────────────────
// Run configuration
// ────────────────────────────────────────────────────────────────────────────

/// Command-line overrides. Anything not given here falls back to the
/// environment, then to the defaults.
#[derive(Debug, Parser)]
#[command(
    name = "worker",
    about = "Generates a batch of interview topics and persists them as one run"
)]
pub struct Cli {
    /// Number of topics to request from the model
    #[arg(long)]
    pub num_topics: Option<u32>,

    /// Difficulty focus: mixed, junior, mid-level, senior or staff
    #[arg(long)]
    pub difficulty_focus: Option<String>,

    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,
}

/// Run overrides read from the environment. Kept as raw strings so a bad
/// value surfaces as a configuration error instead of a panic.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub num_topics: Option<String>,
    pub difficulty_focus: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            num_topics: std::env::var("NUM_TOPICS").ok(),
            difficulty_focus: std::env::var("DIFFICULTY_FOCUS").ok(),
            model: std::env::var("GEMINI_MODEL").ok(),
        }
    }
}

/// How difficulties are spread across a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifficultyFocus {
    /// Spread across all four levels.
    Mixed,
    /// Weighted towards one level.
    Level(Difficulty),
}

impl DifficultyFocus {
    /// Parses the operator-facing keyword, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let keyword = s.trim().to_ascii_lowercase();
        if keyword == "mixed" {
            return Some(DifficultyFocus::Mixed);
        }
        Difficulty::from_keyword(&keyword).map(DifficultyFocus::Level)
    }
}

impl fmt::Display for DifficultyFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFocus::Mixed => f.write_str("mixed"),
            DifficultyFocus::Level(level) => f.write_str(level.as_str()),
        }
    }
}

/// Parameters of one generation run, after precedence is applied:
/// CLI flag, then environment variable, then default.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub num_topics: u32,
    pub difficulty_focus: DifficultyFocus,
    pub model_name: String,
}

impl RunConfig {
    /// Applies precedence and validates every parameter up front. Failures
    /// here abort the run before anything external is touched.
    pub fn resolve(cli: &Cli, env: &EnvOverrides) -> Result<Self, JobError> {
        let num_topics = match (cli.num_topics, env.num_topics.as_deref()) {
            (Some(n), _) => n,
            (None, Some(raw)) => raw.trim().parse::<u32>().map_err(|_| {
                JobError::Config(format!(
                    "NUM_TOPICS must be a positive integer, got '{raw}'"
                ))
            })?,
            (None, None) => DEFAULT_NUM_TOPICS,
        };
        if num_topics == 0 {
            return Err(JobError::Config(
                "number of topics must be at least 1".to_string(),
            ));
        }

        let focus_raw = cli
            .difficulty_focus
            .as_deref()
            .or(env.difficulty_focus.as_deref());
        let difficulty_focus = match focus_raw {
            None => DifficultyFocus::Mixed,
            Some(raw) => DifficultyFocus::parse(raw).ok_or_else(|| {
                JobError::Config(format!(
                    "unknown difficulty focus '{raw}' \
                     (expected mixed, junior, mid-level, senior or staff)"
                ))
            })?,
        };

        let model_name = cli
            .model
            .as_deref()
            .or(env.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .trim()
            .to_string();
        if model_name.is_empty() {
            return Err(JobError::Config("model name must not be empty".to_string()));
        }

        Ok(RunConfig {
            num_topics,
            difficulty_focus,
            model_name,
        })
    }
}
