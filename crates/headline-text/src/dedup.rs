//! Near-duplicate removal across sources.
//!
//! Not true clustering: each pass walks the documents once and keeps an
//! accumulator of representatives. A candidate is dropped as soon as it
//! matches any representative already kept, so which copy of a story survives
//! is decided entirely by walk order.

use tracing::debug;

use headline_core::Document;

use crate::similarity::KeywordSet;

/// Early pass: keep the highest-relevance document of every story.
///
/// Documents are stably sorted by descending relevance before the walk, so
/// among equally scored duplicates the earliest input wins.
pub fn deduplicate_by_similarity(mut items: Vec<Document>) -> Vec<Document> {
    items.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    let before = items.len();
    let kept = greedy_walk(items, KeywordSet::is_similar_to);
    debug!(before, after = kept.len(), "Early-pass dedup complete");
    kept
}

/// Final pass before delivery: looser thresholds, input order preserved.
pub fn final_dedup(items: Vec<Document>) -> Vec<Document> {
    let before = items.len();
    let kept = greedy_walk(items, KeywordSet::is_final_duplicate_of);
    debug!(before, after = kept.len(), "Final-pass dedup complete");
    kept
}

fn greedy_walk<F>(items: Vec<Document>, is_duplicate: F) -> Vec<Document>
where
    F: Fn(&KeywordSet, &KeywordSet) -> bool,
{
    let mut kept: Vec<(KeywordSet, Document)> = Vec::with_capacity(items.len());
    for doc in items {
        let keywords = KeywordSet::from_text(&doc.title);
        let duplicate_of = kept
            .iter()
            .find(|(existing, _)| is_duplicate(&keywords, existing));
        match duplicate_of {
            Some((_, representative)) => {
                debug!(
                    dropped = %doc.title,
                    kept = %representative.title,
                    "Dropped near-duplicate"
                );
            }
            None => kept.push((keywords, doc)),
        }
    }
    kept.into_iter().map(|(_, doc)| doc).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_doc(title: &str, source: &str, relevance: u32) -> Document {
        let mut doc = Document::new(
            title,
            format!("https://{source}.test/{}", title.len()),
            source,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        );
        doc.relevance = relevance;
        doc
    }

    fn titles(items: &[Document]) -> Vec<&str> {
        items.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_keeps_highest_scored_representative() {
        let items = vec![
            make_doc("Earthquake strikes northern Japan coast", "a", 10),
            make_doc("Earthquake strikes northern Japan coast, tsunami warning", "b", 40),
            make_doc("Parliament passes new climate bill", "c", 20),
            make_doc("Strong earthquake strikes Japan northern coast", "d", 5),
        ];
        let kept = deduplicate_by_similarity(items);
        assert_eq!(
            titles(&kept),
            vec![
                "Earthquake strikes northern Japan coast, tsunami warning",
                "Parliament passes new climate bill",
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![
            make_doc("Markets rally after rate cut announcement", "a", 10),
            make_doc("Markets rally after surprise rate cut announcement", "b", 10),
        ];
        let kept = deduplicate_by_similarity(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "a");
    }

    #[test]
    fn test_final_dedup_preserves_input_order() {
        let items = vec![
            make_doc("Parliament passes new climate bill", "c", 1),
            make_doc("Trump announces new tariffs on China imports", "a", 50),
            make_doc("Trump tariffs", "b", 90),
        ];
        let kept = final_dedup(items);
        assert_eq!(
            titles(&kept),
            vec![
                "Parliament passes new climate bill",
                "Trump announces new tariffs on China imports",
            ]
        );
    }

    #[test]
    fn test_final_dedup_is_looser_than_early_pass() {
        let items = vec![
            make_doc("Trump announces new tariffs on China imports", "a", 50),
            make_doc("Trump tariffs", "b", 10),
        ];
        assert_eq!(deduplicate_by_similarity(items.clone()).len(), 2);
        assert_eq!(final_dedup(items).len(), 1);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let items = vec![
            make_doc("Earthquake strikes northern Japan coast", "a", 10),
            make_doc("Earthquake strikes northern Japan coast, tsunami warning", "b", 40),
            make_doc("Parliament passes new climate bill", "c", 20),
            make_doc("Climate bill passes parliament after long debate", "d", 25),
            make_doc("Trump tariffs", "e", 3),
            make_doc("Trump announces new tariffs on China imports", "f", 7),
            make_doc("", "g", 0),
            make_doc("", "h", 0),
        ];

        let once = deduplicate_by_similarity(items.clone());
        let twice = deduplicate_by_similarity(once.clone());
        assert_eq!(once, twice);

        let once = final_dedup(items);
        let twice = final_dedup(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate_by_similarity(vec![]).is_empty());
        assert!(final_dedup(vec![]).is_empty());
    }
}
