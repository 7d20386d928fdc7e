//! In-memory reference backends, grounded in the Python prototype's
//! `Mock*` collaborators (`MockGraphClient`, the embedding/FTS fixtures in
//! `config.py`/`db.py`). These let the CLI and `serve` subcommand run
//! end-to-end without a real vector database, search index, or graph
//! store configured.

use std::collections::HashMap;

use search_retrieve::backend::{Embedder, FTSStore, FtsRow, GraphNode, GraphStore, VectorRow, VectorStore};
use search_retrieve::RetrieveError;

/// Deterministic bag-of-characters "embedding": stable across runs, good
/// enough to exercise the dense strategy without a real model.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrieveError> {
        Ok(texts.iter().map(|t| hash_embed(t, self.dimension)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn provider_tag(&self) -> &str {
        "mock"
    }
}

fn hash_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dimension];
    for (i, byte) in text.bytes().enumerate() {
        v[i % dimension] += byte as f32;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1.0);
    v.iter().map(|x| x / norm).collect()
}

/// A fixed document corpus searchable by naive cosine similarity over
/// [`MockEmbedder`] vectors.
pub struct MockVectorStore {
    rows: Vec<(VectorRow, Vec<f32>)>,
}

impl MockVectorStore {
    pub fn with_fixture_corpus(dimension: usize) -> Self {
        let rows = fixture_documents()
            .into_iter()
            .map(|(doc_id, content)| {
                let vector = hash_embed(content, dimension);
                let row = VectorRow {
                    doc_id: doc_id.to_string(),
                    content: content.to_string(),
                    metadata_json: "{}".to_string(),
                    distance: 0.0,
                };
                (row, vector)
            })
            .collect();
        Self { rows }
    }
}

impl VectorStore for MockVectorStore {
    fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorRow>, RetrieveError> {
        let mut scored: Vec<(f32, VectorRow)> = self
            .rows
            .iter()
            .map(|(row, row_vector)| {
                let distance = 1.0 - cosine_similarity(vector, row_vector);
                let mut row = row.clone();
                row.distance = distance;
                (distance, row)
            })
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored.into_iter().map(|(_, row)| row).collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Naive substring-scoring full-text fixture, supporting the offset-based
/// pagination `retrieve_systematic` depends on.
pub struct MockFtsStore {
    rows: Vec<VectorRow>,
}

impl MockFtsStore {
    pub fn with_fixture_corpus() -> Self {
        let rows = fixture_documents()
            .into_iter()
            .map(|(doc_id, content)| VectorRow {
                doc_id: doc_id.to_string(),
                content: content.to_string(),
                metadata_json: "{}".to_string(),
                distance: 0.0,
            })
            .collect();
        Self { rows }
    }
}

impl FTSStore for MockFtsStore {
    fn search(&self, expr: &str, limit: usize, offset: usize) -> Result<Vec<FtsRow>, RetrieveError> {
        let needle = expr.to_lowercase();
        let matches: Vec<FtsRow> = self
            .rows
            .iter()
            .filter(|row| row.content.to_lowercase().contains(&needle) || needle.is_empty())
            .skip(offset)
            .take(limit)
            .map(|row| FtsRow {
                doc_id: row.doc_id.clone(),
                content: row.content.clone(),
                metadata_json: row.metadata_json.clone(),
                score: 1.0,
            })
            .collect();
        Ok(matches)
    }

    fn snapshot_id(&self) -> Option<i64> {
        Some(1)
    }
}

/// A small fixed knowledge graph, grounded in the Python prototype's
/// `MockGraphClient` fixture (protein -> paper -> adverse event).
pub struct MockGraphStore {
    nodes: HashMap<String, GraphNode>,
    edges: Vec<(String, String)>,
}

impl MockGraphStore {
    pub fn with_fixture_graph() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            "protein_x".to_string(),
            GraphNode {
                node_id: "protein_x".to_string(),
                label: "Protein".to_string(),
                name: "Protein X".to_string(),
                properties: Default::default(),
            },
        );
        nodes.insert(
            "paper_a".to_string(),
            GraphNode {
                node_id: "paper_a".to_string(),
                label: "Paper".to_string(),
                name: "Study on Protein X".to_string(),
                properties: Default::default(),
            },
        );
        nodes.insert(
            "liver_failure".to_string(),
            GraphNode {
                node_id: "liver_failure".to_string(),
                label: "AdverseEvent".to_string(),
                name: "Liver Failure".to_string(),
                properties: Default::default(),
            },
        );
        let edges = vec![
            ("protein_x".to_string(), "paper_a".to_string()),
            ("paper_a".to_string(), "liver_failure".to_string()),
        ];
        Self { nodes, edges }
    }
}

impl GraphStore for MockGraphStore {
    fn search_nodes(&self, text: &str, limit: usize) -> Result<Vec<GraphNode>, RetrieveError> {
        let needle = text.to_lowercase();
        Ok(self
            .nodes
            .values()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    fn neighbors(&self, node_id: &str, depth: u32) -> Result<Vec<GraphNode>, RetrieveError> {
        let mut frontier = vec![node_id.to_string()];
        let mut seen = std::collections::HashSet::new();
        seen.insert(node_id.to_string());
        let mut result = Vec::new();

        for _ in 0..depth {
            let mut next = Vec::new();
            for id in &frontier {
                for (src, dst) in &self.edges {
                    let neighbor = if src == id {
                        Some(dst)
                    } else if dst == id {
                        Some(src)
                    } else {
                        None
                    };
                    if let Some(neighbor) = neighbor {
                        if seen.insert(neighbor.clone()) {
                            if let Some(node) = self.nodes.get(neighbor) {
                                result.push(node.clone());
                                next.push(neighbor.clone());
                            }
                        }
                    }
                }
            }
            frontier = next;
        }
        Ok(result)
    }
}

fn fixture_documents() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "paper_a",
            "This paper discusses Protein X and its association with liver failure in clinical trials.",
        ),
        ("paper_b", "Protein X is generally safe according to this follow-up study."),
        (
            "paper_c",
            "A broad review of adverse events across multiple protein targets, not specific to Protein X.",
        ),
    ]
}
