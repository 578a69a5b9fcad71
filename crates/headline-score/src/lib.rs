//! Headline score crate - relevance scoring from independent signals.
//!
//! Four sub-scores per document:
//! - Cross-feed corroboration by other sources
//! - Trending keyword density across the run's candidate set
//! - Linear recency decay over 24 hours
//! - External discussion signal from Hacker News and Reddit, looked up for the
//!   top candidates only, in rate-limited batches

pub mod error;
pub mod scorer;
pub mod signals;
pub mod social;

pub use error::SocialError;
pub use scorer::RelevanceScorer;
pub use signals::{cross_feed_points, recency_score, trending_score, CorpusIndex};
pub use social::{
    HackerNewsProvider, RedditProvider, SocialEnricher, SocialProvider, SocialSignal,
};
