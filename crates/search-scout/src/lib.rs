//! Query-focused context distillation (spec.md §4.6): per hit, resolve a
//! text source (stored or JIT-fetched), segment it into sentences, score
//! each segment against the query, and reconstruct `distilled_text` from
//! the segments that clear the threshold.
//!
//! The JIT-fetched branch is the component's one subtlety: fetched text is
//! *ephemeral* (spec.md invariant 4, property 9) — it is processed inside
//! [`Scout::distill`] but never written back onto the returned `Hit`'s
//! `original_text`/`content` fields, only (possibly) onto `distilled_text`.

mod error;
mod fetcher;
mod segment;
mod scoring;

pub use error::ScoutError;
pub use fetcher::FetcherHook;

use std::sync::Arc;

use search_retrieve::{Hit, Query};
use serde_json::Value;

/// Default relevance threshold (spec.md §4.6): with the 0/1 scoring model
/// this keeps any segment containing a query term.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy)]
pub struct ScoutConfig {
    pub threshold: f64,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

pub struct Scout {
    fetcher: Option<Arc<dyn FetcherHook>>,
    config: ScoutConfig,
}

impl Scout {
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            fetcher: None,
            config,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn FetcherHook>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// `Distill(query, hits, user_context) -> [Hit]` (spec.md §4.6).
    pub async fn distill(
        &self,
        query: &Query,
        hits: &[Hit],
        user_context: Option<&Value>,
    ) -> Result<Vec<Hit>, ScoutError> {
        let terms = scoring::query_terms(&query.to_text());

        let mut out = Vec::with_capacity(hits.len());
        for hit in hits {
            out.push(self.distill_one(hit, &terms, user_context).await?);
        }
        Ok(out)
    }

    async fn distill_one(
        &self,
        hit: &Hit,
        terms: &std::collections::HashSet<String>,
        user_context: Option<&Value>,
    ) -> Result<Hit, ScoutError> {
        let mut distilled = hit.clone();
        distilled.distilled_text = String::new();

        let text = self.resolve_text(hit, user_context).await?;
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(distilled);
        };

        let segments = segment::segment(&text);
        let kept: Vec<&str> = segments
            .iter()
            .filter(|s| scoring::score_segment(s, terms) > self.config.threshold)
            .map(String::as_str)
            .collect();

        distilled.distilled_text = kept.join(" ");
        Ok(distilled)
    }

    /// Resolve the hit's text source in priority order (spec.md §4.6 step
    /// 1). Text obtained from the fetcher is returned as a local value and
    /// never written onto `distilled.original_text`/`content` by the
    /// caller — it exists only long enough to be segmented.
    async fn resolve_text(
        &self,
        hit: &Hit,
        user_context: Option<&Value>,
    ) -> Result<Option<String>, ScoutError> {
        if let Some(text) = hit.original_text.as_ref().filter(|t| !t.is_empty()) {
            return Ok(Some(text.clone()));
        }

        if let (Some(fetcher), Some(pointer)) = (&self.fetcher, &hit.source_pointer) {
            return fetcher
                .fetch(pointer, user_context)
                .await
                .map_err(|e| match e {
                    ScoutError::Fetcher(msg) => ScoutError::Fetcher(msg),
                    other => other,
                });
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_retrieve::Strategy;
    use serde_json::json;

    fn hit_with_text(doc_id: &str, text: &str) -> Hit {
        let mut h = Hit::new(doc_id, 0.0, Strategy::Dense);
        h.original_text = Some(text.to_string());
        h
    }

    #[tokio::test]
    async fn keeps_matching_sentence_scenario_s5() {
        let scout = Scout::new(ScoutConfig::default());
        let hit = hit_with_text("doc1", "Apple is a fruit. Cars are fast.");
        let result = scout
            .distill(&Query::Text("fruit".into()), std::slice::from_ref(&hit), None)
            .await
            .unwrap();

        assert_eq!(result[0].distilled_text, "Apple is a fruit.");
    }

    #[tokio::test]
    async fn no_text_yields_empty_distillation() {
        let scout = Scout::new(ScoutConfig::default());
        let hit = Hit::new("doc1", 0.0, Strategy::Dense);
        let result = scout
            .distill(&Query::Text("fruit".into()), std::slice::from_ref(&hit), None)
            .await
            .unwrap();
        assert_eq!(result[0].distilled_text, "");
    }

    #[tokio::test]
    async fn empty_query_term_set_yields_empty_distillation() {
        let scout = Scout::new(ScoutConfig::default());
        let hit = hit_with_text("doc1", "Apple is a fruit. Cars are fast.");
        let result = scout
            .distill(&Query::Text(String::new()), std::slice::from_ref(&hit), None)
            .await
            .unwrap();
        assert_eq!(result[0].distilled_text, "");
    }

    struct MockFetcher;

    #[async_trait::async_trait]
    impl FetcherHook for MockFetcher {
        async fn fetch(
            &self,
            _source_pointer: &serde_json::Map<String, Value>,
            _user_context: Option<&Value>,
        ) -> Result<Option<String>, ScoutError> {
            Ok(Some("Fetched text mentions a fruit basket.".to_string()))
        }
    }

    #[tokio::test]
    async fn fetched_content_is_ephemeral_property_9() {
        let scout = Scout::new(ScoutConfig::default()).with_fetcher(Arc::new(MockFetcher));
        let mut hit = Hit::new("doc1", 0.0, Strategy::Dense);
        hit.source_pointer = Some(json!({"uri": "s3://bucket/doc1"}).as_object().unwrap().clone());

        let result = scout
            .distill(&Query::Text("fruit".into()), std::slice::from_ref(&hit), None)
            .await
            .unwrap();

        assert!(result[0].original_text.is_none());
        assert!(result[0].content.is_none());
        assert_eq!(result[0].distilled_text, "Fetched text mentions a fruit basket.");
    }

    struct FailingFetcher;

    #[async_trait::async_trait]
    impl FetcherHook for FailingFetcher {
        async fn fetch(
            &self,
            _source_pointer: &serde_json::Map<String, Value>,
            _user_context: Option<&Value>,
        ) -> Result<Option<String>, ScoutError> {
            Err(ScoutError::Fetcher("timeout".into()))
        }
    }

    #[tokio::test]
    async fn fetcher_failure_propagates() {
        let scout = Scout::new(ScoutConfig::default()).with_fetcher(Arc::new(FailingFetcher));
        let mut hit = Hit::new("doc1", 0.0, Strategy::Dense);
        hit.source_pointer = Some(json!({"uri": "s3://bucket/doc1"}).as_object().unwrap().clone());

        let result = scout
            .distill(&Query::Text("fruit".into()), std::slice::from_ref(&hit), None)
            .await;
        assert!(result.is_err());
    }
}
