use std::sync::Arc;

use search_audit::{AuditSink, TracingAuditSink};
use search_rerank::{HeuristicReranker, Reranker};
use search_retrieve::prelude::{DenseRetriever, GraphRetriever, SparseRetriever};
use search_scout::{Scout, ScoutConfig};

use super::{Orchestrator, DEFAULT_SYSTEMATIC_BATCH_SIZE, RERANK_WINDOW};

/// Builds an [`Orchestrator`]. Every collaborator is optional except the
/// strategy retrievers, which default to "not configured" (a request
/// naming an unconfigured strategy is skipped with a warning rather than
/// failing the whole request, per the per-strategy isolation contract).
pub struct OrchestratorBuilder {
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

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            dense: None,
            sparse: None,
            graph: None,
            rrf_k: search_fusion::DEFAULT_K,
            reranker: Arc::new(HeuristicReranker),
            scout: Arc::new(Scout::new(ScoutConfig::default())),
            audit: Arc::new(TracingAuditSink::default()),
            rerank_window: RERANK_WINDOW,
            systematic_batch_size: DEFAULT_SYSTEMATIC_BATCH_SIZE,
        }
    }

    pub fn with_dense(mut self, dense: Arc<DenseRetriever>) -> Self {
        self.dense = Some(dense);
        self
    }

    pub fn with_sparse(mut self, sparse: Arc<SparseRetriever>) -> Self {
        self.sparse = Some(sparse);
        self
    }

    pub fn with_graph(mut self, graph: Arc<GraphRetriever>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_rrf_k(mut self, rrf_k: u32) -> Self {
        self.rrf_k = rrf_k;
        self
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn with_scout(mut self, scout: Arc<Scout>) -> Self {
        self.scout = scout;
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_rerank_window(mut self, window: usize) -> Self {
        self.rerank_window = window;
        self
    }

    pub fn with_systematic_batch_size(mut self, size: usize) -> Self {
        self.systematic_batch_size = size;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            dense: self.dense,
            sparse: self.sparse,
            graph: self.graph,
            rrf_k: self.rrf_k,
            reranker: self.reranker,
            scout: self.scout,
            audit: self.audit,
            rerank_window: self.rerank_window,
            systematic_batch_size: self.systematic_batch_size,
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
