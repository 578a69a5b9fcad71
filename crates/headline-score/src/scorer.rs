use chrono::{DateTime, Utc};
use tracing::{debug, info};

use headline_core::config::SocialConfig;
use headline_core::{Document, ScoreBreakdown};

use crate::error::SocialError;
use crate::signals::{cross_feed_points, recency_score, trending_score, CorpusIndex};
use crate::social::SocialEnricher;

/// Assigns a `ScoreBreakdown` to every candidate of one run.
pub struct RelevanceScorer {
    social: Option<SocialEnricher>,
    top_n: usize,
}

impl RelevanceScorer {
    pub fn new(social: SocialEnricher, top_n: usize) -> Self {
        Self {
            social: Some(social),
            top_n,
        }
    }

    /// Scorer without external lookups: the social sub-score stays 0.
    pub fn offline() -> Self {
        Self {
            social: None,
            top_n: 0,
        }
    }

    pub fn from_config(config: &SocialConfig) -> Result<Self, SocialError> {
        if !config.enabled {
            return Ok(Self::offline());
        }
        Ok(Self::new(SocialEnricher::from_config(config)?, config.top_n))
    }

    pub fn has_social(&self) -> bool {
        self.social.is_some() && self.top_n > 0
    }

    /// Cross-feed, trending and recency for every item.
    pub fn score_offline(&self, items: &mut [Document], now: DateTime<Utc>) {
        let index = CorpusIndex::build(items);
        for (i, doc) in items.iter_mut().enumerate() {
            let score = ScoreBreakdown {
                cross_feed: cross_feed_points(index.cross_feed_matches(i)),
                trending: trending_score(index.trending_hits(i)),
                recency: recency_score(doc.age_hours(now)),
                social: 0,
            };
            doc.apply_score(score);
        }
        debug!(
            items = items.len(),
            trending = index.trending_keywords().len(),
            "Offline scoring complete"
        );
    }

    /// Full scoring. Social lookups go to the top candidates by pre-social
    /// score; everything else keeps a social score of 0.
    pub async fn score_all(&self, mut items: Vec<Document>, now: DateTime<Utc>) -> Vec<Document> {
        self.score_offline(&mut items, now);

        let Some(enricher) = self.social.as_ref().filter(|_| self.top_n > 0) else {
            return items;
        };

        let candidates = top_indices(&items, self.top_n);
        let urls: Vec<String> = candidates.iter().map(|&i| items[i].canonical_link()).collect();
        let scores = enricher.score_urls(&urls).await;

        for (&i, social) in candidates.iter().zip(scores) {
            let mut score = items[i].score;
            score.social = social;
            items[i].apply_score(score);
        }
        info!(
            items = items.len(),
            enriched = candidates.len(),
            "Relevance scoring complete"
        );
        items
    }
}

/// Indices of the `n` best linked items by pre-social score; ties keep input
/// order. Items without a link are never looked up.
fn top_indices(items: &[Document], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..items.len())
        .filter(|&i| !items[i].canonical_link().is_empty())
        .collect();
    indices.sort_by(|&a, &b| items[b].score.pre_social().cmp(&items[a].score.pre_social()));
    indices.truncate(n);
    indices
}
