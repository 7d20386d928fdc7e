//! Error types for search-scout.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScoutError {
    /// The JIT content fetcher failed; aborts the whole distill pass
    /// (spec.md §7).
    Fetcher(String),
    Other(String),
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoutError::Fetcher(msg) => write!(f, "fetcher error: {}", msg),
            ScoutError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for ScoutError {}
