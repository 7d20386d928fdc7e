//! Dense-vector retrieval strategy adapter (spec.md §6, §4.1 step 1).
//!
//! Embeds the query's semantic text, searches a [`VectorStore`], and maps
//! rows into fresh [`Hit`] values. Score is `1.0 - _distance` per the
//! `VectorStore` contract.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{Embedder, VectorRow, VectorStore};
use crate::query::to_semantic_text;
use crate::types::{Hit, SearchRequest, Strategy};
use crate::RetrieveError;

pub struct DenseRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl DenseRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// The embedder's provider tag, surfaced by `GET /health` (spec.md §6).
    pub fn provider_tag(&self) -> &str {
        self.embedder.provider_tag()
    }

    /// `Retrieve(request) -> [Hit]`.
    pub fn retrieve(&self, request: &SearchRequest) -> Result<Vec<Hit>, RetrieveError> {
        let text = to_semantic_text(&request.query);
        let vectors = self.embedder.embed(&[text])?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| RetrieveError::Backend("embedder returned no vector".into()))?;

        let rows = self.store.search(&vector, request.top_k)?;
        rows.into_iter().map(row_to_hit).collect()
    }
}

fn row_to_hit(row: VectorRow) -> Result<Hit, RetrieveError> {
    let metadata = parse_metadata(&row.metadata_json)?;
    let mut hit = Hit::new(row.doc_id, (1.0 - row.distance) as f64, Strategy::Dense);
    hit.content = Some(row.content);
    hit.metadata = metadata;
    Ok(hit)
}

/// Malformed stored metadata -> empty mapping, logged (spec.md §7 "Data"
/// error kind); this is not a fatal error for the retrieval call.
pub(crate) fn parse_metadata(raw: &str) -> Result<serde_json::Map<String, Value>, RetrieveError> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => {
            tracing::warn!(raw, "malformed metadata JSON; treating as empty mapping");
            Ok(serde_json::Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Query;

    struct MockEmbedder;
    impl Embedder for MockEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrieveError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }
        fn dimension(&self) -> usize {
            3
        }
        fn provider_tag(&self) -> &str {
            "mock"
        }
    }

    struct MockStore;
    impl VectorStore for MockStore {
        fn search(&self, _vector: &[f32], limit: usize) -> Result<Vec<VectorRow>, RetrieveError> {
            Ok((0..limit.min(2))
                .map(|i| VectorRow {
                    doc_id: format!("doc{i}"),
                    content: "hello".into(),
                    metadata_json: "{}".into(),
                    distance: 0.1 * i as f32,
                })
                .collect())
        }
    }

    #[test]
    fn retrieve_maps_rows_to_hits() {
        let retriever = DenseRetriever::new(Arc::new(MockEmbedder), Arc::new(MockStore));
        let request = SearchRequest::new(Query::Text("hi".into()), vec![Strategy::Dense]);
        let hits = retriever.retrieve(&request).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, "doc0");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }
}
