//! Traits for the external backends the retrieval strategies adapt over.
//!
//! # Design Philosophy
//!
//! `search-retrieve` does not implement a vector store, a full-text index,
//! or a knowledge-graph service — it adapts over them. Each collaborator is
//! a narrow trait (spec.md §6); concrete variants (a real backend, a mock,
//! an auto-fallback) are selected at construction and passed in as
//! `Arc<dyn Trait + Send + Sync>`.
//!
//! This keeps `search-retrieve` lightweight: integrating Qdrant, Tantivy, or
//! a graph database means implementing one of these traits, not depending
//! on their client crates from this crate.
//!
//! # Usage
//!
//! ```rust,no_run
//! use search_retrieve::backend::{VectorStore, VectorRow};
//! use search_retrieve::RetrieveError;
//!
//! struct MyVectorStore;
//!
//! impl VectorStore for MyVectorStore {
//!     fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorRow>, RetrieveError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

use crate::RetrieveError;
use serde_json::Value;

/// `Embedder.Embed(text | [text]) -> float_matrix[n][d]` (spec.md §6).
///
/// Deterministic batch size; an empty `texts` input returns an empty matrix
/// with the declared `dimension()`.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrieveError>;

    fn dimension(&self) -> usize;

    /// A tag identifying the provider, surfaced by `GET /health`.
    fn provider_tag(&self) -> &str;
}

/// One row returned by a `VectorStore` or `FTSStore` search.
#[derive(Debug, Clone)]
pub struct VectorRow {
    pub doc_id: String,
    pub content: String,
    /// Serialized metadata (JSON string), per the persisted row schema.
    pub metadata_json: String,
    /// `_distance` in spec.md §6; score is derived as `1.0 - distance`.
    pub distance: f32,
}

/// One row returned by an FTS search; carries `_score` directly rather than
/// a distance.
#[derive(Debug, Clone)]
pub struct FtsRow {
    pub doc_id: String,
    pub content: String,
    pub metadata_json: String,
    pub score: f32,
}

/// `VectorStore.Search(vector).Limit(N).ToList()` (spec.md §6).
pub trait VectorStore: Send + Sync {
    fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorRow>, RetrieveError>;
}

/// `FTSStore.Search(expr, fts).Limit(N).Offset(O).ToList()` (spec.md §6).
///
/// Index creation is assumed out-of-band; absence of an index is a fatal
/// backend error, not an empty result.
pub trait FTSStore: Send + Sync {
    fn search(&self, expr: &str, limit: usize, offset: usize) -> Result<Vec<FtsRow>, RetrieveError>;

    /// Integer version of the backend's table at query start, used as the
    /// systematic-mode snapshot id; `None` if the backend can't report one
    /// (the caller substitutes `-1`).
    fn snapshot_id(&self) -> Option<i64> {
        None
    }
}

/// One node in the graph backend.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub node_id: String,
    pub label: String,
    pub name: String,
    pub properties: serde_json::Map<String, Value>,
}

/// `GraphStore.SearchNodes`/`GraphStore.Neighbors` (spec.md §6).
pub trait GraphStore: Send + Sync {
    fn search_nodes(&self, text: &str, limit: usize) -> Result<Vec<GraphNode>, RetrieveError>;

    fn neighbors(&self, node_id: &str, depth: u32) -> Result<Vec<GraphNode>, RetrieveError>;
}
