//! Knowledge-graph retrieval strategy adapter (spec.md §4.8): entity-to-
//! document expansion with a 2-hop adverse-event validity filter.
//!
//! There is no graph-retrieval code in the teacher crate; this module's
//! algorithm is grounded directly on the Python prototype's
//! `retrievers/graph.py`, expressed in this crate's adapter-over-a-trait
//! idiom.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::backend::{GraphNode, GraphStore};
use crate::query::to_semantic_text;
use crate::types::{Hit, SearchRequest, Strategy};
use crate::RetrieveError;

/// How many start nodes the initial entity search resolves to before 1-hop
/// expansion. Not specified by the contract; generous enough that `top_k`
/// papers usually survive the adverse-event filter.
const START_NODE_LIMIT: usize = 50;

const LABEL_PAPER: &str = "Paper";
const LABEL_ADVERSE_EVENT: &str = "AdverseEvent";

pub struct GraphRetriever {
    store: Arc<dyn GraphStore>,
}

impl GraphRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    pub fn retrieve(&self, request: &SearchRequest) -> Result<Vec<Hit>, RetrieveError> {
        let text = to_semantic_text(&request.query);
        let start_nodes = self.store.search_nodes(&text, START_NODE_LIMIT)?;

        let mut seen_paper_ids = HashSet::new();
        let mut papers: Vec<GraphNode> = Vec::new();
        for start in &start_nodes {
            for neighbor in self.store.neighbors(&start.node_id, 1)? {
                if neighbor.label == LABEL_PAPER && seen_paper_ids.insert(neighbor.node_id.clone()) {
                    papers.push(neighbor);
                }
            }
        }

        let mut hits = Vec::new();
        for paper in papers {
            let second_hop = self.store.neighbors(&paper.node_id, 1)?;
            let mut adverse_events: Vec<String> = second_hop
                .iter()
                .filter(|n| n.label == LABEL_ADVERSE_EVENT)
                .map(|n| n.name.clone())
                .collect();
            if adverse_events.is_empty() {
                continue;
            }
            adverse_events.sort();
            adverse_events.dedup();

            let content = paper
                .properties
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let mut metadata = paper.properties.clone();
            metadata.insert(
                "connected_adverse_events".to_string(),
                Value::Array(adverse_events.into_iter().map(Value::String).collect()),
            );

            let mut hit = Hit::new(paper.node_id.clone(), 1.0, Strategy::Graph);
            hit.content = Some(content);
            hit.metadata = metadata;
            hits.push(hit);
        }

        hits.truncate(request.top_k);
        Ok(hits)
    }
}
