//! The retrieval pipeline orchestrator (spec.md §4.1): drives the bounded
//! top-k `execute` and the unbounded audited `execute_systematic` modes,
//! fanning out to the strategy adapters in `search-retrieve` and composing
//! `search-fusion`, `search-rerank`, `search-scout`, and `search-audit`.

mod builder;

pub use builder::OrchestratorBuilder;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_stream::try_stream;
use futures::Stream;
use serde_json::json;

use search_audit::{AuditSink, SYSTEMATIC_SEARCH_COMPLETE, SYSTEMATIC_SEARCH_START};
use search_rerank::Reranker;
use search_retrieve::prelude::{DenseRetriever, GraphRetriever, SparseRetriever};
use search_retrieve::{Hit, SearchRequest, SearchResponse, Strategy};
use search_scout::Scout;

use crate::OrchestratorError;

/// Upper bound on candidates passed from Fusion into Reranker (spec.md §4,
/// "Rerank window").
pub const RERANK_WINDOW: usize = 50;

/// Default page size for the systematic mode's sparse paging.
pub const DEFAULT_SYSTEMATIC_BATCH_SIZE: usize = 1000;

/// `GET /health`'s `database`/`embedder` fields (spec.md §6).
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub database: String,
    pub embedder: String,
}

pub struct Orchestrator {
    dense: Option<Arc<DenseRetriever>>,
    sparse: Option<Arc<SparseRetriever>>,
    graph: Option<Arc<GraphRetriever>>,
    rrf_k: u32,
    reranker: Arc<dyn Reranker>,
    scout: Arc<Scout>,
    audit: Arc<dyn AuditSink>,
    rerank_window: usize,
    systematic_batch_size: usize,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Backing for `GET /health` (spec.md §6): `database` reflects whether
    /// a sparse/FTS backend is configured and reachable (its snapshot id
    /// resolves); `embedder` is the configured dense embedder's provider
    /// tag, or `"none"` when no dense retriever is wired in.
    pub fn health(&self) -> HealthStatus {
        let database = match &self.sparse {
            Some(sparse) if sparse.snapshot_id() >= 0 => "connected",
            Some(_) => "disconnected",
            None => "disconnected",
        };
        let embedder = self
            .dense
            .as_ref()
            .map(|d| d.provider_tag().to_string())
            .unwrap_or_else(|| "none".to_string());

        HealthStatus {
            database: database.to_string(),
            embedder,
        }
    }

    /// `Execute(request) -> SearchResponse | Error` (spec.md §4.1).
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResponse, OrchestratorError> {
        request.validate()?;
        let start = Instant::now();

        // Step 1: parallel dispatch, one task per strategy, failures
        // isolated per-strategy and logged (spec.md §4.1 step 1, §5
        // concurrency contract). Collection below follows
        // `request.strategies` order, not completion order.
        let mut handles = Vec::with_capacity(request.strategies.len());
        for strategy in &request.strategies {
            let strategy = *strategy;
            let req = request.clone();
            let dense = self.dense.clone();
            let sparse = self.sparse.clone();
            let graph = self.graph.clone();
            handles.push(tokio::spawn(async move {
                let result = match strategy {
                    Strategy::Dense => dense.map(|r| r.retrieve(&req)),
                    Strategy::Fts => sparse.map(|r| r.retrieve(&req)),
                    Strategy::Graph => graph.map(|r| r.retrieve(&req)),
                };
                (strategy, result)
            }));
        }

        let mut all_hits: Vec<Vec<Hit>> = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((strategy, Some(Ok(hits)))) if !hits.is_empty() => all_hits.push(hits),
                Ok((strategy, Some(Ok(_)))) => {
                    tracing::debug!(%strategy, "strategy returned no hits");
                }
                Ok((strategy, Some(Err(e)))) => {
                    tracing::warn!(%strategy, error = %e, "strategy failed; isolating");
                }
                Ok((strategy, None)) => {
                    tracing::warn!(%strategy, "strategy not configured; skipping");
                }
                Err(join_err) => {
                    tracing::warn!(error = %join_err, "strategy task panicked; isolating");
                }
            }
        }

        // Step 2: fuse, or concatenate + dedup when fusion is disabled
        // (spec.md §4.1 step 2; §9's open question — preserved as
        // concatenation, not "first list only").
        let fused = if !all_hits.is_empty() {
            if request.fusion_enabled {
                search_fusion::rrf_k(&all_hits, self.rrf_k)
            } else {
                concat_dedup(all_hits)
            }
        } else {
            Vec::new()
        };

        // Step 3: truncate to the rerank window.
        let mut window = fused;
        window.truncate(self.rerank_window);

        // Step 4: rerank, or take the first top_k of the window.
        let reranked = if request.rerank_enabled && !window.is_empty() {
            self.reranker
                .rerank(&request.query, &window, request.top_k)
                .map_err(|e| OrchestratorError::Rerank(e.to_string()))?
        } else {
            window.into_iter().take(request.top_k).collect()
        };

        // Step 5: distill, or pass through unchanged (distilled_text stays
        // empty, per spec.md §9's open-question resolution).
        let distilled = if request.distill_enabled && !reranked.is_empty() {
            self.scout
                .distill(&request.query, &reranked, request.user_context.as_ref())
                .await?
        } else {
            reranked
        };

        let query_text = request.query.to_text();
        let provenance_hash =
            search_audit::provenance_hash(&query_text, distilled.iter().map(|h| h.doc_id.as_str()));
        let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(SearchResponse::new(distilled, execution_time_ms, provenance_hash))
    }

    /// `ExecuteSystematic(request) -> Stream<Hit>` (spec.md §4.1): a
    /// pull-driven, unbounded, audited enumeration. Never runs Fusion,
    /// Reranker, or Scout (invariant 6).
    pub fn execute_systematic<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> impl Stream<Item = Result<Hit, OrchestratorError>> + 'a {
        try_stream! {
            request.validate()?;

            let snapshot_id = self
                .sparse
                .as_ref()
                .map(|s| s.snapshot_id())
                .unwrap_or(-1);

            let start_payload = json!({
                "query": request.query,
                "strategies": request.strategies,
                "snapshot_id": snapshot_id,
            });
            self.audit
                .log(SYSTEMATIC_SEARCH_START, start_payload)
                .await?;

            // Installed only after START succeeds (spec.md §7: "Streams
            // always bracket with START/COMPLETE events when START
            // succeeded"). Its `Drop` fires COMPLETE with whatever count
            // was reached even under consumer-initiated early
            // termination — the post-yield increment below only runs
            // once the stream is polled again, which is exactly spec.md
            // §9's "increment after successful delivery" convention.
            let count = Arc::new(AtomicUsize::new(0));
            let _guard = CompleteGuard::install(self.audit.clone(), count.clone());

            for strategy in &request.strategies {
                match strategy {
                    Strategy::Fts => {
                        if let Some(sparse) = &self.sparse {
                            let stream = sparse.retrieve_systematic(request, self.systematic_batch_size);
                            futures::pin_mut!(stream);
                            while let Some(hit) = futures::StreamExt::next(&mut stream).await {
                                let hit = hit?;
                                yield hit;
                                count.fetch_add(1, Ordering::SeqCst);
                            }
                        } else {
                            tracing::warn!("fts strategy requested but no sparse retriever configured");
                        }
                    }
                    Strategy::Dense => {
                        tracing::warn!(
                            "dense strategy used in systematic mode; only bounded top_k results will be yielded"
                        );
                        if let Some(dense) = &self.dense {
                            for hit in dense.retrieve(request)? {
                                yield hit;
                                count.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                    }
                    Strategy::Graph => {
                        tracing::warn!("graph strategy is not supported in systematic mode; skipping");
                    }
                }
            }
        }
    }
}

/// Fires `SYSTEMATIC_SEARCH_COMPLETE` exactly once, on `Drop` — covering
/// both normal stream exhaustion and consumer-initiated early termination,
/// since both paths drop the generator's locals. Logging is async, so the
/// synchronous `Drop` impl hands the final count to a detached task over a
/// oneshot channel rather than blocking.
struct CompleteGuard {
    trigger: Option<tokio::sync::oneshot::Sender<()>>,
}

impl CompleteGuard {
    fn install(sink: Arc<dyn AuditSink>, count: Arc<AtomicUsize>) -> Self {
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let _ = rx.await;
            let total_found = count.load(Ordering::SeqCst);
            if let Err(e) = sink
                .log(SYSTEMATIC_SEARCH_COMPLETE, json!({"total_found": total_found}))
                .await
            {
                tracing::error!(error = %e, "failed to log SYSTEMATIC_SEARCH_COMPLETE");
            }
        });
        Self { trigger: Some(tx) }
    }
}

impl Drop for CompleteGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.trigger.take() {
            let _ = tx.send(());
        }
    }
}

/// `fusion_enabled = false` path: concatenate in request-strategy order,
/// then dedup by `doc_id` keeping the first occurrence (spec.md §4.1
/// step 2).
fn concat_dedup(lists: Vec<Vec<Hit>>) -> Vec<Hit> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for hit in list {
            if seen.insert(hit.doc_id.clone()) {
                out.push(hit);
            }
        }
    }
    out
}
