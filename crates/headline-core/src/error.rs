use std::fmt;

use thiserror::Error;

/// Pipeline stage that runs under a wall-clock budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fan-out over every configured document source.
    Fetch,
    /// Relevance scoring, including the social lookups.
    Enrichment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Enrichment => f.write_str("enrichment"),
        }
    }
}

/// Top-level error type for the Headline system.
///
/// Recoverable failures (one source, one provider, one persistence write) are
/// logged where they happen and never reach this type. What does reach it is
/// either a configuration problem or a stage that blew its time budget.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HeadlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Stage timeout: {stage} exceeded {timeout_secs}s")]
    StageTimeout { stage: Stage, timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HeadlineError {
    fn from(err: toml::de::Error) -> Self {
        HeadlineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HeadlineError {
    fn from(err: toml::ser::Error) -> Self {
        HeadlineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HeadlineError {
    fn from(err: serde_json::Error) -> Self {
        HeadlineError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Headline operations.
pub type Result<T> = std::result::Result<T, HeadlineError>;
