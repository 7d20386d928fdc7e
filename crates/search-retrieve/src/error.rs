//! Error types for search-retrieve.

use std::fmt;

/// Errors that can occur during retrieval operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrieveError {
    /// Request validation failed (empty strategies, non-positive top_k, ...).
    InvalidRequest(String),
    /// Malformed filter predicate tree.
    InvalidFilter(String),
    /// A backend call failed (vector store, FTS index, graph store).
    Backend(String),
    /// Stored metadata could not be parsed as JSON; treated as empty by callers,
    /// but surfaced here for logging.
    MalformedMetadata(String),
    /// Other error (for extensibility).
    Other(String),
}

impl fmt::Display for RetrieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieveError::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            RetrieveError::InvalidFilter(msg) => write!(f, "invalid filter: {}", msg),
            RetrieveError::Backend(msg) => write!(f, "backend error: {}", msg),
            RetrieveError::MalformedMetadata(msg) => write!(f, "malformed metadata: {}", msg),
            RetrieveError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for RetrieveError {}
