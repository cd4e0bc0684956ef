//! Engine configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::infrastructure::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::infrastructure::ports::JournalLevel;
use crate::use_cases::rounds::{DEFAULT_CHARACTERS_PER_ROUND, DEFAULT_ROUNDS};

/// Engine configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding `characters/`, `locations/` and `relations/`
    pub data_dir: PathBuf,
    /// Directory for markdown run journals
    pub log_dir: PathBuf,
    /// Lowest level written to the run journal
    pub journal_level: JournalLevel,

    /// Number of rounds per run
    pub rounds: u32,
    /// Characters sampled (with replacement) per round
    pub characters_per_round: usize,

    pub llm: LlmConfig,

    /// Demo HTTP server bind address
    pub server_host: String,
    pub server_port: u16,
}

/// Chat-completions endpoint and models
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Model used to narrate vignettes
    pub director_model: String,
    /// Model used to extract new world elements
    pub archivist_model: String,
    pub timeout_secs: u64,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let director_model = var("DIRECTOR_MODEL", DEFAULT_MODEL);
        let archivist_model = lookup("ARCHIVIST_MODEL").unwrap_or_else(|| director_model.clone());

        let journal_level = match lookup("WORLDSIM_JOURNAL_LEVEL") {
            None => JournalLevel::Info,
            Some(raw) => JournalLevel::parse(&raw).with_context(|| {
                format!("WORLDSIM_JOURNAL_LEVEL must be one of debug, info, warning, error, got {raw:?}")
            })?,
        };

        Ok(Self {
            data_dir: PathBuf::from(var("WORLDSIM_DATA_DIR", "./data")),
            log_dir: PathBuf::from(var("WORLDSIM_LOG_DIR", "./logs")),
            journal_level,

            rounds: parse_var(&lookup, "WORLDSIM_ROUNDS", DEFAULT_ROUNDS)?,
            characters_per_round: parse_var(
                &lookup,
                "WORLDSIM_CHARACTERS_PER_ROUND",
                DEFAULT_CHARACTERS_PER_ROUND,
            )?,

            llm: LlmConfig {
                base_url: var("LLM_BASE_URL", DEFAULT_BASE_URL),
                api_key: lookup("LLM_API_KEY").filter(|key| !key.is_empty()),
                director_model,
                archivist_model,
                timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },

            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: parse_var(&lookup, "SERVER_PORT", 8000)?,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
    }
}
