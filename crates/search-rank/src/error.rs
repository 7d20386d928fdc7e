//! Error types for search-rank.

use std::fmt;

use search_audit::AuditError;
use search_retrieve::RetrieveError;
use search_scout::ScoutError;

#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// Request validation failed (spec.md §7): surfaced to the caller.
    Validation(String),
    /// The re-ranking stage failed; not isolated, unlike per-strategy
    /// retrieval failures.
    Rerank(String),
    /// Scout (distillation) failed — most commonly a propagated fetcher
    /// error (spec.md §7 "Fetcher: propagated; the offending hit aborts
    /// the whole distill pass").
    Scout(String),
    /// The audit sink failed in systematic mode, where auditing is
    /// mandatory (spec.md §4.1 step 2).
    Audit(String),
    /// A strategy backend (vector store, FTS index, graph store) or stored
    /// metadata failed mid-retrieval — a genuine runtime/backend failure,
    /// not a malformed request (spec.md §7 distinguishes "Validation" from
    /// "Backend"/"Data" error kinds).
    Retrieve(String),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorError::Validation(msg) => write!(f, "invalid request: {}", msg),
            OrchestratorError::Rerank(msg) => write!(f, "rerank error: {}", msg),
            OrchestratorError::Scout(msg) => write!(f, "scout error: {}", msg),
            OrchestratorError::Audit(msg) => write!(f, "audit error: {}", msg),
            OrchestratorError::Retrieve(msg) => write!(f, "retrieve error: {}", msg),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl From<RetrieveError> for OrchestratorError {
    fn from(e: RetrieveError) -> Self {
        match e {
            RetrieveError::InvalidRequest(msg) => OrchestratorError::Validation(msg),
            RetrieveError::InvalidFilter(msg) => OrchestratorError::Validation(msg),
            RetrieveError::Backend(_) | RetrieveError::MalformedMetadata(_) | RetrieveError::Other(_) => {
                OrchestratorError::Retrieve(e.to_string())
            }
        }
    }
}

impl From<ScoutError> for OrchestratorError {
    fn from(e: ScoutError) -> Self {
        OrchestratorError::Scout(e.to_string())
    }
}

impl From<AuditError> for OrchestratorError {
    fn from(e: AuditError) -> Self {
        OrchestratorError::Audit(e.to_string())
    }
}
