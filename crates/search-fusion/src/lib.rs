//! Reciprocal rank fusion (spec.md §4.4).
//!
//! Combines multiple ranked [`Hit`] lists into one by accumulating
//! `1 / (k + rank + 1)` per list a document appears in, keeping the first
//! occurrence of each `doc_id` as the canonical `Hit`, and sorting by the
//! accumulated score descending with ties broken by first-appearance order.
//!
//! Only RRF is implemented. The facade crate's prelude comments also name
//! ISR, CombMNZ, CombSUM, Borda, DBSF, and weighted fusion; those are out of
//! scope for this spec and are not stubbed here.

mod error;

pub use error::FusionError;

use indexmap::IndexMap;
use search_retrieve::Hit;

/// Default `k` in the RRF formula, per spec.md §4.4.
pub const DEFAULT_K: u32 = 60;

#[derive(Debug, Clone, Copy)]
pub struct RrfConfig {
    pub k: u32,
}

impl Default for RrfConfig {
    fn default() -> Self {
        Self { k: DEFAULT_K }
    }
}

/// RRF with the default `k` (60).
pub fn rrf(lists: &[Vec<Hit>]) -> Vec<Hit> {
    rrf_k(lists, DEFAULT_K)
}

/// RRF with an explicit `k`.
pub fn rrf_k(lists: &[Vec<Hit>], k: u32) -> Vec<Hit> {
    let mut accum: IndexMap<String, (Hit, f64)> = IndexMap::new();

    for list in lists {
        for (rank, hit) in list.iter().enumerate() {
            let contribution = 1.0 / (k as f64 + rank as f64 + 1.0);
            accum
                .entry(hit.doc_id.clone())
                .and_modify(|(_, score)| *score += contribution)
                .or_insert_with(|| (hit.clone(), contribution));
        }
    }

    let mut fused: Vec<Hit> = accum
        .into_values()
        .map(|(hit, score)| hit.with_score(score))
        .collect();

    // Stable sort: ties retain the first-appearance (insertion) order
    // already present in `fused`.
    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
