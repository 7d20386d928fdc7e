//! Error types for search-rerank.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RerankError {
    /// The underlying cross-encoder/model backend failed.
    Backend(String),
    Other(String),
}

impl fmt::Display for RerankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RerankError::Backend(msg) => write!(f, "reranker backend error: {}", msg),
            RerankError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for RerankError {}
