//! Deterministic sub-scores: cross-feed, trending and recency.
//!
//! Cross-document signals read from a `CorpusIndex` built once from the
//! complete candidate set, so a document's score never depends on the order
//! in which other documents are processed.

use std::collections::{HashMap, HashSet};

use headline_core::Document;
use headline_text::KeywordSet;

/// Share of a document's title keywords another title must contain to
/// corroborate it.
const CROSS_FEED_MIN_SHARE: f64 = 0.4;

/// A keyword is trending once this many documents mention it.
const TRENDING_MIN_DOCUMENTS: usize = 3;
const TRENDING_POINTS_PER_HIT: u32 = 5;
const TRENDING_CAP: u32 = 30;

const RECENCY_MAX: f64 = 20.0;
const RECENCY_WINDOW_HOURS: f64 = 24.0;

/// Per-run keyword tables over the whole candidate set.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    sources: Vec<String>,
    title_keywords: Vec<KeywordSet>,
    content_keywords: Vec<KeywordSet>,
    /// Number of distinct documents whose title+description mention a keyword.
    document_frequency: HashMap<String, usize>,
}

impl CorpusIndex {
    pub fn build(items: &[Document]) -> Self {
        let sources = items.iter().map(|d| d.source.clone()).collect();
        let title_keywords: Vec<KeywordSet> =
            items.iter().map(|d| KeywordSet::from_text(&d.title)).collect();
        let content_keywords: Vec<KeywordSet> = items
            .iter()
            .map(|d| KeywordSet::from_text(&format!("{} {}", d.title, d.description)))
            .collect();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for keywords in &content_keywords {
            for word in keywords.words() {
                *document_frequency.entry(word.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            sources,
            title_keywords,
            content_keywords,
            document_frequency,
        }
    }

    /// Distinct other sources with a title sharing at least 40% of document
    /// `i`'s title keywords.
    pub fn cross_feed_matches(&self, i: usize) -> usize {
        let own = &self.title_keywords[i];
        if own.is_empty() {
            return 0;
        }
        let own_source = &self.sources[i];
        let mut matched: HashSet<&str> = HashSet::new();
        for (j, other) in self.title_keywords.iter().enumerate() {
            let source = self.sources[j].as_str();
            if j == i || source == own_source || matched.contains(source) {
                continue;
            }
            let share = own.shared(other) as f64 / own.len() as f64;
            if share >= CROSS_FEED_MIN_SHARE {
                matched.insert(source);
            }
        }
        matched.len()
    }

    pub fn is_trending(&self, word: &str) -> bool {
        self.document_frequency.get(word).copied().unwrap_or(0) >= TRENDING_MIN_DOCUMENTS
    }

    /// Distinct trending keywords in document `i`'s title and description.
    pub fn trending_hits(&self, i: usize) -> usize {
        self.content_keywords[i]
            .words()
            .filter(|w| self.is_trending(w))
            .count()
    }

    pub fn trending_keywords(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .document_frequency
            .iter()
            .filter(|(_, count)| **count >= TRENDING_MIN_DOCUMENTS)
            .map(|(word, _)| word.as_str())
            .collect();
        words.sort_unstable();
        words
    }
}

/// Points for the number of corroborating sources.
pub fn cross_feed_points(matches: usize) -> u32 {
    match matches {
        0 => 0,
        1 => 30,
        2 => 40,
        _ => 50,
    }
}

pub fn trending_score(hits: usize) -> u32 {
    (hits as u32)
        .saturating_mul(TRENDING_POINTS_PER_HIT)
        .min(TRENDING_CAP)
}

/// `max(0, round(20 * (1 - age/24)))`. Timestamps in the future count as
/// brand new.
pub fn recency_score(age_hours: f64) -> u32 {
    let age = if age_hours.is_finite() { age_hours.max(0.0) } else { RECENCY_WINDOW_HOURS };
    let score = (RECENCY_MAX * (1.0 - age / RECENCY_WINDOW_HOURS)).round();
    if score <= 0.0 {
        0
    } else {
        score as u32
    }
}
