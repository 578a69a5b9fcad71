use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HeadlineError, Result};
use crate::types::SourceDescriptor;

/// Top-level configuration for Headline.
///
/// Loaded from `~/.headline/config.toml` by default. Every section falls back
/// to its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadlineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

impl HeadlineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HeadlineConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing or
    /// cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the configuration as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HeadlineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the delivered-state database or file.
    pub data_dir: String,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.headline/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Selection limits for the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Maximum documents returned per ranking pass.
    pub max_items: usize,
    /// Documents older than this are never ranked.
    pub max_age_hours: u32,
    /// Cap on accepted documents from a single source.
    pub max_per_source: usize,
    /// Age after which the delivered record is ignored.
    pub retention_hours: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_items: 10,
            max_age_hours: 24,
            max_per_source: 3,
            retention_hours: 48,
        }
    }
}

/// Social signal lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub enabled: bool,
    /// Only this many documents (by pre-social score) are looked up.
    pub top_n: usize,
    /// Concurrent lookups per batch.
    pub batch_size: usize,
    /// Pause between batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Hacker News Algolia search endpoint.
    pub hacker_news_url: String,
    /// Reddit link-info endpoint.
    pub reddit_url: String,
    pub user_agent: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: 20,
            batch_size: 5,
            batch_delay_ms: 1000,
            request_timeout_secs: 10,
            hacker_news_url: "https://hn.algolia.com/api/v1/search".to_string(),
            reddit_url: "https://www.reddit.com/api/info.json".to_string(),
            user_agent: concat!("headline/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Wall-clock budgets for the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fetch_timeout_secs: u64,
    pub enrichment_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 60,
            enrichment_timeout_secs: 120,
        }
    }
}

/// Where delivered state lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// File name inside `general.data_dir`.
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            file_name: "delivered.db".to_string(),
        }
    }
}
