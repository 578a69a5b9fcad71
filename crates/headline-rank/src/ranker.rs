//! Delivery selection.
//!
//! A rank call reads the delivered record once, filters and deduplicates the
//! candidates, picks a source-diverse top list and writes the record back
//! once. Callers must not run two rank calls against the same store
//! concurrently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use headline_core::{DeliveredSet, Document, DELIVERED_RETENTION_HOURS};
use headline_storage::DeliveredStore;
use headline_text::deduplicate_by_similarity;

/// Default cap of items per source in one delivery.
pub const DEFAULT_MAX_PER_SOURCE: usize = 3;

/// Window used by `top_of_day`.
const TOP_OF_DAY_HOURS: u32 = 24;

pub struct Ranker {
    store: Arc<dyn DeliveredStore>,
    max_per_source: usize,
    retention: Duration,
}

impl Ranker {
    pub fn new(store: Arc<dyn DeliveredStore>) -> Self {
        Self {
            store,
            max_per_source: DEFAULT_MAX_PER_SOURCE,
            retention: Duration::hours(DELIVERED_RETENTION_HOURS),
        }
    }

    pub fn with_max_per_source(mut self, max_per_source: usize) -> Self {
        self.max_per_source = max_per_source.max(1);
        self
    }

    pub fn with_retention_hours(mut self, hours: u32) -> Self {
        self.retention = Duration::hours(i64::from(hours));
        self
    }

    /// Select up to `max_items` undelivered documents no older than
    /// `max_age_hours` and mark them delivered.
    pub fn rank(&self, items: Vec<Document>, max_items: usize, max_age_hours: u32) -> Vec<Document> {
        self.rank_at(items, max_items, max_age_hours, Utc::now())
    }

    pub fn rank_at(
        &self,
        items: Vec<Document>,
        max_items: usize,
        max_age_hours: u32,
        now: DateTime<Utc>,
    ) -> Vec<Document> {
        let delivered = self.load_delivered(now);
        let selected = self.select(items, max_items, max_age_hours, now, Some(&delivered));

        let record = delivered.merge_into_record(selected.iter().map(Document::canonical_link), now);
        match self.store.save(&record) {
            Ok(()) => debug!(delivered = record.urls.len(), "Delivered state saved"),
            Err(e) => warn!(error = %e, "Failed to save delivered state"),
        }
        selected
    }

    /// Best documents of the last 24 hours, regardless of what was delivered.
    /// Read-only: the delivered record is neither consulted nor written.
    pub fn top_of_day(&self, items: Vec<Document>, max_items: usize) -> Vec<Document> {
        self.top_of_day_at(items, max_items, Utc::now())
    }

    pub fn top_of_day_at(
        &self,
        items: Vec<Document>,
        max_items: usize,
        now: DateTime<Utc>,
    ) -> Vec<Document> {
        self.select(items, max_items, TOP_OF_DAY_HOURS, now, None)
    }

    fn load_delivered(&self, now: DateTime<Utc>) -> DeliveredSet {
        let record = match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to load delivered state, treating as empty");
                None
            }
        };
        let set = DeliveredSet::from_record(record, now, self.retention);
        debug!(delivered = set.len(), "Delivered state loaded");
        set
    }

    fn select(
        &self,
        items: Vec<Document>,
        max_items: usize,
        max_age_hours: u32,
        now: DateTime<Utc>,
        delivered: Option<&DeliveredSet>,
    ) -> Vec<Document> {
        let candidates = items.len();
        let max_age = f64::from(max_age_hours);
        let eligible: Vec<Document> = items
            .into_iter()
            .filter(|doc| !doc.canonical_link().is_empty())
            .filter(|doc| doc.age_hours(now) <= max_age)
            .filter(|doc| delivered.map_or(true, |set| !set.contains(&doc.canonical_link())))
            .collect();
        let eligible_count = eligible.len();

        // Comes back sorted by relevance, descending and stable.
        let unique = deduplicate_by_similarity(eligible);
        let unique_count = unique.len();

        let selected = diversify(unique, max_items, self.max_per_source);
        info!(
            candidates,
            eligible = eligible_count,
            unique = unique_count,
            selected = selected.len(),
            "Ranking complete"
        );
        selected
    }
}

/// Walk in rank order, skipping documents whose canonical link was already
/// picked or whose source already has `max_per_source` picks, until
/// `max_items` are chosen.
fn diversify(ranked: Vec<Document>, max_items: usize, max_per_source: usize) -> Vec<Document> {
    let mut per_source: HashMap<String, usize> = HashMap::new();
    let mut links: HashSet<String> = HashSet::new();
    let mut selected = Vec::with_capacity(max_items.min(ranked.len()));
    for doc in ranked {
        if selected.len() >= max_items {
            break;
        }
        let link = doc.canonical_link();
        if links.contains(&link) {
            debug!(link = %link, title = %doc.title, "Link already selected");
            continue;
        }
        let count = per_source.entry(doc.source.clone()).or_insert(0);
        if *count >= max_per_source {
            debug!(source = %doc.source, title = %doc.title, "Source cap reached");
            continue;
        }
        *count += 1;
        links.insert(link);
        selected.push(doc);
    }
    selected
}
