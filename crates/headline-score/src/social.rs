//! External discussion signals.
//!
//! Two read-only providers are queried by canonical URL: Hacker News through
//! the Algolia search API and Reddit through `/api/info.json`. Each may return
//! several submissions for the same link; only the highest-scored one counts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use headline_core::config::SocialConfig;

use crate::error::SocialError;

/// Upper bound of the social sub-score.
const SOCIAL_CAP: u64 = 50;

/// One submission of a link on a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocialSignal {
    pub score: u64,
    pub comments: u64,
}

impl SocialSignal {
    /// Comments count double: they are a stronger engagement signal than votes.
    pub fn weight(&self) -> u64 {
        self.score.saturating_add(self.comments.saturating_mul(2))
    }

    /// Highest-score candidate, or zero when there is none. Equal scores are
    /// broken by comment count.
    pub fn best(candidates: &[SocialSignal]) -> SocialSignal {
        candidates
            .iter()
            .copied()
            .max_by_key(|s| (s.score, s.comments))
            .unwrap_or_default()
    }
}

/// A query-by-URL discussion provider.
#[async_trait]
pub trait SocialProvider: Send + Sync {
    fn name(&self) -> &str;

    /// All known submissions of `url`. May be empty.
    async fn lookup(&self, url: &str) -> Result<Vec<SocialSignal>, SocialError>;
}

fn build_client(config: &SocialConfig) -> Result<Client, SocialError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?)
}

// =============================================================================
// Hacker News
// =============================================================================

#[derive(Debug, Deserialize)]
struct AlgoliaResponse {
    #[serde(default)]
    hits: Vec<AlgoliaHit>,
}

#[derive(Debug, Deserialize)]
struct AlgoliaHit {
    #[serde(default)]
    points: Option<u64>,
    #[serde(default)]
    num_comments: Option<u64>,
}

/// Hacker News stories submitted with a given URL.
pub struct HackerNewsProvider {
    client: Client,
    base_url: String,
}

impl HackerNewsProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &SocialConfig) -> Result<Self, SocialError> {
        Ok(Self::new(build_client(config)?, config.hacker_news_url.clone()))
    }
}

#[async_trait]
impl SocialProvider for HackerNewsProvider {
    fn name(&self) -> &str {
        "hacker_news"
    }

    async fn lookup(&self, url: &str) -> Result<Vec<SocialSignal>, SocialError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("query", url),
                ("restrictSearchableAttributes", "url"),
                ("tags", "story"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SocialError::Status {
                provider: self.name().to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: AlgoliaResponse = response
            .json()
            .await
            .map_err(|e| SocialError::Decode(e.to_string()))?;

        Ok(body
            .hits
            .into_iter()
            .map(|hit| SocialSignal {
                score: hit.points.unwrap_or(0),
                comments: hit.num_comments.unwrap_or(0),
            })
            .collect())
    }
}

// =============================================================================
// Reddit
// =============================================================================

#[derive(Debug, Deserialize)]
struct RedditListing {
    data: RedditListingData,
}

#[derive(Debug, Deserialize)]
struct RedditListingData {
    #[serde(default)]
    children: Vec<RedditChild>,
}

#[derive(Debug, Deserialize)]
struct RedditChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
}

/// Reddit submissions of a given URL across all subreddits.
pub struct RedditProvider {
    client: Client,
    base_url: String,
}

impl RedditProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &SocialConfig) -> Result<Self, SocialError> {
        Ok(Self::new(build_client(config)?, config.reddit_url.clone()))
    }
}

#[async_trait]
impl SocialProvider for RedditProvider {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn lookup(&self, url: &str) -> Result<Vec<SocialSignal>, SocialError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SocialError::Status {
                provider: self.name().to_string(),
                status: response.status().as_u16(),
            });
        }

        let listing: RedditListing = response
            .json()
            .await
            .map_err(|e| SocialError::Decode(e.to_string()))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| SocialSignal {
                // Downvoted posts carry no positive signal.
                score: child.data.score.max(0) as u64,
                comments: child.data.num_comments,
            })
            .collect())
    }
}

// =============================================================================
// Enricher
// =============================================================================

/// Runs social lookups in fixed-size concurrent batches with a pause between
/// batches.
pub struct SocialEnricher {
    providers: Vec<Arc<dyn SocialProvider>>,
    batch_size: usize,
    batch_delay: Duration,
}

impl SocialEnricher {
    pub fn new(
        providers: Vec<Arc<dyn SocialProvider>>,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        Self {
            providers,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Hacker News + Reddit with the configured endpoints and pacing.
    pub fn from_config(config: &SocialConfig) -> Result<Self, SocialError> {
        let providers: Vec<Arc<dyn SocialProvider>> = vec![
            Arc::new(HackerNewsProvider::from_config(config)?),
            Arc::new(RedditProvider::from_config(config)?),
        ];
        Ok(Self::new(
            providers,
            config.batch_size,
            Duration::from_millis(config.batch_delay_ms),
        ))
    }

    /// Social sub-score for one URL. Provider failures count as no signal.
    pub async fn social_score(&self, url: &str) -> u32 {
        let lookups = self.providers.iter().map(|provider| async move {
            match provider.lookup(url).await {
                Ok(candidates) => SocialSignal::best(&candidates),
                Err(e) => {
                    warn!(provider = provider.name(), url, error = %e, "Social lookup failed");
                    SocialSignal::default()
                }
            }
        });

        let total = join_all(lookups)
            .await
            .iter()
            .fold(0u64, |acc, signal| acc.saturating_add(signal.weight()));
        let score = total.min(SOCIAL_CAP) as u32;
        debug!(url, score, "Social score computed");
        score
    }

    /// Scores for `urls`, in the same order.
    pub async fn score_urls(&self, urls: &[String]) -> Vec<u32> {
        let mut scores = Vec::with_capacity(urls.len());
        for (batch_index, batch) in urls.chunks(self.batch_size).enumerate() {
            if batch_index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            let batch_scores = join_all(batch.iter().map(|url| self.social_score(url))).await;
            scores.extend(batch_scores);
        }
        info!(
            lookups = urls.len(),
            batches = urls.len().div_ceil(self.batch_size),
            "Social enrichment complete"
        );
        scores
    }
}
