//! One ranking run: fetch, score, rank, final dedup.
//!
//! Fetch and enrichment each run under a wall-clock budget. A source that
//! fails contributes nothing; a stage that runs out of time aborts the run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use headline_core::config::PipelineConfig;
use headline_core::error::{HeadlineError, Result, Stage};
use headline_core::Document;
use headline_score::RelevanceScorer;
use headline_text::final_dedup;

use crate::ranker::Ranker;
use crate::sources::DocumentSource;

pub struct Pipeline {
    sources: Vec<Arc<dyn DocumentSource>>,
    scorer: RelevanceScorer,
    ranker: Ranker,
    fetch_timeout: Duration,
    enrichment_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        sources: Vec<Arc<dyn DocumentSource>>,
        scorer: RelevanceScorer,
        ranker: Ranker,
    ) -> Self {
        Self::with_config(sources, scorer, ranker, &PipelineConfig::default())
    }

    pub fn with_config(
        sources: Vec<Arc<dyn DocumentSource>>,
        scorer: RelevanceScorer,
        ranker: Ranker,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            sources,
            scorer,
            ranker,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            enrichment_timeout: Duration::from_secs(config.enrichment_timeout_secs),
        }
    }

    /// Fetch from every source concurrently. Failed sources are logged and
    /// contribute no documents.
    pub async fn fetch_all(&self) -> Result<Vec<Document>> {
        let fetches = self.sources.iter().map(|source| async move {
            match source.fetch().await {
                Ok(docs) => {
                    info!(source = source.name(), count = docs.len(), "Source fetched");
                    docs
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source failed, skipping");
                    Vec::new()
                }
            }
        });

        let batches = within(Stage::Fetch, self.fetch_timeout, join_all(fetches)).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Score the full candidate set, social lookups included.
    pub async fn score(&self, items: Vec<Document>, now: DateTime<Utc>) -> Result<Vec<Document>> {
        within(
            Stage::Enrichment,
            self.enrichment_timeout,
            self.scorer.score_all(items, now),
        )
        .await
    }

    /// Full run: fetch, score, rank against the delivered state, final dedup.
    pub async fn run(&self, max_items: usize, max_age_hours: u32) -> Result<Vec<Document>> {
        self.run_at(max_items, max_age_hours, Utc::now()).await
    }

    pub async fn run_at(
        &self,
        max_items: usize,
        max_age_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Document>> {
        let span = info_span!("pipeline_run", run_id = %Uuid::new_v4(), mode = "rank");
        async move {
            let fetched = self.fetch_all().await?;
            let scored = self.score(fetched, now).await?;
            let ranked = self.ranker.rank_at(scored, max_items, max_age_hours, now);
            let delivered = final_dedup(ranked);
            info!(delivered = delivered.len(), "Run complete");
            Ok(delivered)
        }
        .instrument(span)
        .await
    }

    /// Best of the last 24 hours. Does not touch delivered state.
    pub async fn top_of_day(&self, max_items: usize) -> Result<Vec<Document>> {
        self.top_of_day_at(max_items, Utc::now()).await
    }

    pub async fn top_of_day_at(
        &self,
        max_items: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Document>> {
        let span = info_span!("pipeline_run", run_id = %Uuid::new_v4(), mode = "top");
        async move {
            let fetched = self.fetch_all().await?;
            let scored = self.score(fetched, now).await?;
            let top = final_dedup(self.ranker.top_of_day_at(scored, max_items, now));
            info!(delivered = top.len(), "Run complete");
            Ok(top)
        }
        .instrument(span)
        .await
    }
}

async fn within<F, T>(stage: Stage, budget: Duration, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(budget, fut).await.map_err(|_| {
        warn!(%stage, timeout_secs = budget.as_secs(), "Stage timed out");
        HeadlineError::StageTimeout {
            stage,
            timeout_secs: budget.as_secs(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use headline_score::{SocialEnricher, SocialError, SocialProvider, SocialSignal};
    use headline_storage::MemoryDeliveredStore;

    enum Behavior {
        Docs(Vec<Document>),
        Fail,
        Hang,
    }

    struct StubSource {
        name: String,
        behavior: Behavior,
    }

    #[async_trait]
    impl DocumentSource for StubSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self) -> Result<Vec<Document>> {
            match &self.behavior {
                Behavior::Docs(docs) => Ok(docs.clone()),
                Behavior::Fail => Err(HeadlineError::Fetch("connection refused".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl SocialProvider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn lookup(&self, _url: &str) -> std::result::Result<Vec<SocialSignal>, SocialError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn source(name: &str, behavior: Behavior) -> Arc<dyn DocumentSource> {
        Arc::new(StubSource {
            name: name.to_string(),
            behavior,
        })
    }

    fn doc(title: &str, source: &str, link: &str) -> Document {
        Document::new(title, link, source, now() - chrono::Duration::hours(1))
    }

    fn pipeline(sources: Vec<Arc<dyn DocumentSource>>, scorer: RelevanceScorer) -> Pipeline {
        Pipeline::new(
            sources,
            scorer,
            Ranker::new(Arc::new(MemoryDeliveredStore::new())),
        )
    }

    #[tokio::test]
    async fn test_failed_source_contributes_nothing() {
        let p = pipeline(
            vec![
                source("ok", Behavior::Docs(vec![doc("Storm batters coast", "ok", "https://ok.test/1")])),
                source("down", Behavior::Fail),
            ],
            RelevanceScorer::offline(),
        );
        let out = p.run_at(10, 24, now()).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_aborts_run() {
        let p = pipeline(
            vec![
                source("ok", Behavior::Docs(vec![doc("Storm batters coast", "ok", "https://ok.test/1")])),
                source("slow", Behavior::Hang),
            ],
            RelevanceScorer::offline(),
        );
        let err = p.run_at(10, 24, now()).await.unwrap_err();
        assert!(matches!(
            err,
            HeadlineError::StageTimeout {
                stage: Stage::Fetch,
                timeout_secs: 60
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_timeout_aborts_run() {
        let enricher = SocialEnricher::new(
            vec![Arc::new(HangingProvider) as Arc<dyn SocialProvider>],
            5,
            Duration::ZERO,
        );
        let p = pipeline(
            vec![source(
                "ok",
                Behavior::Docs(vec![doc("Storm batters coast", "ok", "https://ok.test/1")]),
            )],
            RelevanceScorer::new(enricher, 20),
        );
        let err = p.top_of_day_at(10, now()).await.unwrap_err();
        assert!(matches!(
            err,
            HeadlineError::StageTimeout {
                stage: Stage::Enrichment,
                timeout_secs: 120
            }
        ));
        assert_eq!(err.to_string(), "Stage timeout: enrichment exceeded 120s");
    }

    #[tokio::test]
    async fn test_no_sources_yields_empty_run() {
        let p = pipeline(Vec::new(), RelevanceScorer::offline());
        assert!(p.run_at(10, 24, now()).await.unwrap().is_empty());
    }
}
