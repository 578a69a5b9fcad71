use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use headline_core::{DeliveredRecord, Document};
use headline_rank::{DocumentSource, JsonFileSource, Pipeline, Ranker};
use headline_score::RelevanceScorer;
use headline_storage::{
    Database, DeliveredStore, JsonFileDeliveredStore, MemoryDeliveredStore, SqliteDeliveredStore,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn doc(title: &str, source: &str, link: &str, age_minutes: i64) -> Document {
    Document::new(title, link, source, now() - Duration::minutes(age_minutes))
}

fn earthquake_cluster() -> Vec<Document> {
    vec![
        doc(
            "Earthquake strikes northern Japan coast",
            "wire",
            "https://wire.test/quake",
            30,
        ),
        doc(
            "Earthquake strikes northern Japan coast, tsunami warning issued",
            "herald",
            "https://herald.test/quake",
            10,
        ),
        doc(
            "Strong earthquake strikes Japan northern coast",
            "times",
            "https://times.test/quake",
            120,
        ),
        doc(
            "Museum reopens after renovation",
            "post",
            "https://post.test/museum",
            15,
        ),
    ]
}

fn write_source(dir: &std::path::Path, name: &str, docs: &[Document]) -> Arc<dyn DocumentSource> {
    let path = dir.join(format!("{name}.json"));
    std::fs::write(&path, serde_json::to_string(docs).unwrap()).unwrap();
    Arc::new(JsonFileSource::from_path(path))
}

#[tokio::test]
async fn test_cluster_collapses_to_highest_scored_representative() {
    let scored = RelevanceScorer::offline()
        .score_all(earthquake_cluster(), now())
        .await;
    let best_in_cluster = scored[..3].iter().map(|d| d.relevance).max().unwrap();

    let ranker = Ranker::new(Arc::new(MemoryDeliveredStore::new()));
    let ranked = ranker.rank_at(scored, 10, 24, now());

    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].title.to_lowercase().contains("earthquake"));
    assert_eq!(ranked[0].relevance, best_in_cluster);
    assert_eq!(ranked[1].title, "Museum reopens after renovation");
    assert!(ranked[0].relevance >= ranked[1].relevance);
}

#[tokio::test]
async fn test_pipeline_end_to_end_with_sqlite_state() {
    let dir = tempfile::tempdir().unwrap();
    let cluster = earthquake_cluster();
    let sources = vec![
        write_source(dir.path(), "wire", &cluster[..1]),
        write_source(dir.path(), "herald", &cluster[1..2]),
        write_source(dir.path(), "mixed", &cluster[2..]),
    ];

    let db = Arc::new(Database::new(&dir.path().join("delivered.db")).unwrap());
    let store = Arc::new(SqliteDeliveredStore::new(db));
    let pipeline = Pipeline::new(
        sources,
        RelevanceScorer::offline(),
        Ranker::new(store.clone()),
    );

    let first = pipeline.run_at(10, 24, now()).await.unwrap();
    assert_eq!(first.len(), 2);
    let record = store.load().unwrap().unwrap();
    assert_eq!(record.urls.len(), 2);

    // Delivered representatives are filtered; the remaining cluster members
    // collapse into one new item.
    let second = pipeline
        .run_at(10, 24, now() + Duration::minutes(5))
        .await
        .unwrap();
    for item in &second {
        assert!(!first.iter().any(|f| f.canonical_link() == item.canonical_link()));
    }
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn test_no_more_than_three_per_source() {
    let titles = [
        "Central bank raises interest rates",
        "Football club signs striker",
        "Volcano erupts near Reykjavik",
        "Parliament approves budget",
        "Storm batters western coast",
    ];
    let items: Vec<Document> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| doc(t, "wire", &format!("https://wire.test/{i}"), 10))
        .collect();
    let scored = RelevanceScorer::offline().score_all(items, now()).await;

    let ranked = Ranker::new(Arc::new(MemoryDeliveredStore::new())).rank_at(scored, 10, 24, now());
    assert_eq!(ranked.len(), 3);
    assert!(ranked.iter().all(|d| d.source == "wire"));
}

#[tokio::test]
async fn test_record_older_than_retention_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileDeliveredStore::new(dir.path().join("delivered.json")));
    store
        .save(&DeliveredRecord {
            urls: vec!["https://post.test/museum".to_string()],
            timestamp: (now() - Duration::hours(49)).timestamp_millis(),
        })
        .unwrap();

    let ranker = Ranker::new(store.clone());
    let items = vec![doc(
        "Museum reopens after renovation",
        "post",
        "https://post.test/museum/",
        15,
    )];
    let ranked = ranker.rank_at(items.clone(), 10, 24, now());
    assert_eq!(ranked.len(), 1);

    // A fresh record does block it.
    let again = ranker.rank_at(items, 10, 72, now() + Duration::hours(47));
    assert!(again.is_empty());
}
