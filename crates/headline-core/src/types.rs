use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Sources
// =============================================================================

/// How a source is fetched. Opaque to the ranking pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// RSS or Atom feed.
    Feed,
    /// Scraped HTML listing page.
    Page,
    /// Social listing such as a subreddit.
    SocialList,
}

/// A configured news source. Only `name` matters downstream of the fetch
/// layer: it becomes `Document::source`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    #[serde(default)]
    pub category: String,
}

// =============================================================================
// Documents and scores
// =============================================================================

/// Per-signal relevance sub-scores for one document.
///
/// The total is derived on demand so it can never drift from its parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Corroboration by other sources (0, 30, 40 or 50).
    pub cross_feed: u32,
    /// Trending keyword density (0..=30).
    pub trending: u32,
    /// Linear freshness decay (0..=20).
    pub recency: u32,
    /// External discussion signal (0..=50).
    pub social: u32,
}

impl ScoreBreakdown {
    /// Sum of the four sub-scores.
    pub fn total(&self) -> u32 {
        self.cross_feed + self.trending + self.recency + self.social
    }

    /// Score before the social lookup, used to pick lookup candidates.
    pub fn pre_social(&self) -> u32 {
        self.cross_feed + self.trending + self.recency
    }
}

/// A fetched headline.
///
/// `title`, `link`, `source` and `published_at` are identity fields and are
/// never rewritten by the pipeline. Only `score` and its mirror `relevance`
/// change as the document moves through the stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub link: String,
    /// Name of the source the document came from. May be absent in intake
    /// files; the intake adapter fills it in.
    #[serde(default)]
    pub source: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: ScoreBreakdown,
    /// Mirror of `score.total()`, kept for sorting and for the delivery layer.
    #[serde(default)]
    pub relevance: u32,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            source: source.into(),
            published_at,
            description: String::new(),
            score: ScoreBreakdown::default(),
            relevance: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Store a score breakdown and mirror its total into `relevance`.
    pub fn apply_score(&mut self, score: ScoreBreakdown) {
        self.score = score;
        self.relevance = score.total();
    }

    /// Age in fractional hours relative to `now`. Negative for future timestamps.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.published_at).num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn canonical_link(&self) -> String {
        canonicalize_url(&self.link)
    }
}

/// Canonical form of a URL for delivered-state membership and social lookups:
/// trimmed, trailing slashes stripped, lowercased.
pub fn canonicalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

// =============================================================================
// Delivered state
// =============================================================================

/// Default retention window for delivered state.
pub const DELIVERED_RETENTION_HOURS: i64 = 48;

/// Durable record of links already shown to the consumer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredRecord {
    pub urls: Vec<String>,
    /// Epoch milliseconds of the last write.
    pub timestamp: i64,
}

impl DeliveredRecord {
    /// A record is stale once it is older than the retention window.
    pub fn is_stale(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        now.timestamp_millis() - self.timestamp > retention.num_milliseconds()
    }
}

/// Set view over a delivered record, empty when the record is stale.
#[derive(Clone, Debug, Default)]
pub struct DeliveredSet {
    urls: HashSet<String>,
}

impl DeliveredSet {
    pub fn from_record(
        record: Option<DeliveredRecord>,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Self {
        match record {
            Some(record) if !record.is_stale(now, retention) => Self {
                urls: record.urls.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    pub fn contains(&self, canonical_url: &str) -> bool {
        self.urls.contains(canonical_url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Merge newly delivered links and stamp the result with `now`.
    pub fn merge_into_record<I>(mut self, links: I, now: DateTime<Utc>) -> DeliveredRecord
    where
        I: IntoIterator<Item = String>,
    {
        self.urls.extend(links);
        let mut urls: Vec<String> = self.urls.into_iter().collect();
        urls.sort();
        DeliveredRecord {
            urls,
            timestamp: now.timestamp_millis(),
        }
    }
}
