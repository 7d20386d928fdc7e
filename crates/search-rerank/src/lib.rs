//! Bounded re-scoring of a candidate set against a query (spec.md §4.5).
//!
//! The orchestrator truncates Fusion's output to the 50-hit rerank window
//! and, when `rerank_enabled`, hands it to a [`Reranker`] along with the
//! caller's `top_k`. The re-scoring function itself is an external
//! collaborator (spec.md §6) — a real cross-encoder model lives behind the
//! same trait a test double does.

mod error;

pub use error::RerankError;

use search_retrieve::{Hit, Query};

/// `Reranker.Rerank(query, [hit], top_k) -> [hit]` (spec.md §6). Must
/// return fresh `Hit` copies — inputs are never mutated.
pub trait Reranker: Send + Sync {
    fn rerank(&self, query: &Query, hits: &[Hit], top_k: usize) -> Result<Vec<Hit>, RerankError>;
}

/// Identity truncation: the reference `Reranker` for `rerank_enabled =
/// false` wiring, or for pipelines with no real re-ranking model configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReranker;

impl Reranker for NullReranker {
    fn rerank(&self, _query: &Query, hits: &[Hit], top_k: usize) -> Result<Vec<Hit>, RerankError> {
        Ok(hits.iter().take(top_k).cloned().collect())
    }
}

/// Deterministic reference `Reranker`, grounded in the Python prototype's
/// `MockReranker`: scores by content length rather than a real
/// cross-encoder, so tests can assert on reordering without a model
/// dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicReranker;

impl Reranker for HeuristicReranker {
    fn rerank(&self, _query: &Query, hits: &[Hit], top_k: usize) -> Result<Vec<Hit>, RerankError> {
        let mut scored: Vec<Hit> = hits
            .iter()
            .map(|hit| {
                let text = hit
                    .content
                    .as_deref()
                    .or(hit.original_text.as_deref())
                    .unwrap_or("");
                hit.with_score(text.len() as f64 * 0.01)
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
