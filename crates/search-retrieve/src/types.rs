//! The shared data model: `Query`, `SearchRequest`, `Hit`, `SearchResponse`.
//!
//! These types cross every crate boundary in the pipeline (retrieve, fusion,
//! rerank, scout, audit, the facade). They carry no behavior beyond small
//! constructors and the normalization rule in [`Query::to_text`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A strategy tag identifying one retrieval path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Dense,
    Fts,
    Graph,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Dense => "dense",
            Strategy::Fts => "fts",
            Strategy::Graph => "graph",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query is either free text or a field -> term mapping.
///
/// Order matters for [`Query::Fields`] — the "concatenate all values in
/// mapping-iteration order" normalization rule is semantically significant,
/// which is why this holds an `IndexMap` rather than a `HashMap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    Text(String),
    Fields(IndexMap<String, String>),
}

impl Query {
    /// If the mapping has a `text` key, use its value; otherwise
    /// concatenate all values in mapping-iteration order, separated by
    /// spaces.
    pub fn to_text(&self) -> String {
        match self {
            Query::Text(s) => s.clone(),
            Query::Fields(map) => {
                if let Some(text) = map.get("text") {
                    text.clone()
                } else {
                    map.values().cloned().collect::<Vec<_>>().join(" ")
                }
            }
        }
    }
}

/// A metadata predicate tree, evaluated by `search_retrieve::filter`.
///
/// Stored as raw JSON on the request; [`crate::filter::Filter`] parses and
/// evaluates it. Kept untyped here so malformed filter JSON is a validation
/// error at parse time, not a request-construction-time panic.
pub type FilterSpec = Value;

/// A single search request: one query, dispatched across one or more
/// strategies, with fusion/rerank/distillation independently switchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Query,
    pub strategies: Vec<Strategy>,
    #[serde(default = "default_true")]
    pub fusion_enabled: bool,
    #[serde(default = "default_true")]
    pub rerank_enabled: bool,
    #[serde(default = "default_true")]
    pub distill_enabled: bool,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSpec>,
    /// Opaque identity record; never interpreted by the pipeline, only
    /// forwarded to the fetcher hook and the audit sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<Value>,
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> usize {
    5
}

impl SearchRequest {
    pub fn new(query: Query, strategies: Vec<Strategy>) -> Self {
        Self {
            query,
            strategies,
            fusion_enabled: true,
            rerank_enabled: true,
            distill_enabled: true,
            top_k: default_top_k(),
            filters: None,
            user_context: None,
        }
    }

    /// Empty strategies or a non-positive `top_k` are caller errors.
    pub fn validate(&self) -> Result<(), crate::RetrieveError> {
        if self.strategies.is_empty() {
            return Err(crate::RetrieveError::InvalidRequest(
                "strategies must not be empty".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(crate::RetrieveError::InvalidRequest(
                "top_k must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// One retrieved document, carried through fusion, reranking, and
/// distillation.
///
/// `original_text`/`content` must never carry text obtained by the JIT
/// fetcher — only `distilled_text` may. Stages never mutate an input
/// `Hit`; they produce fresh copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default)]
    pub distilled_text: String,
    pub score: f64,
    pub source_strategy: Strategy,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_pointer: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acls: Option<Vec<String>>,
}

impl Hit {
    pub fn new(doc_id: impl Into<String>, score: f64, source_strategy: Strategy) -> Self {
        Self {
            doc_id: doc_id.into(),
            content: None,
            original_text: None,
            distilled_text: String::new(),
            score,
            source_strategy,
            metadata: serde_json::Map::new(),
            source_pointer: None,
            acls: None,
        }
    }

    /// Returns a fresh copy with an updated score. Used by Fusion/Rerank,
    /// which must not mutate their inputs.
    pub fn with_score(&self, score: f64) -> Self {
        let mut copy = self.clone();
        copy.score = score;
        copy
    }
}

/// The final result of `Execute`: hits plus the bookkeeping needed to
/// audit and reproduce the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Hit>,
    pub total_found: usize,
    pub execution_time_ms: f64,
    pub provenance_hash: String,
}

impl SearchResponse {
    pub fn new(hits: Vec<Hit>, execution_time_ms: f64, provenance_hash: String) -> Self {
        let total_found = hits.len();
        Self {
            hits,
            total_found,
            execution_time_ms,
            provenance_hash,
        }
    }
}
