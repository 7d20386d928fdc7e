//! Error types for search-fusion.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FusionError {
    /// `k` must be non-negative for the `1 / (k + rank + 1)` formula to be
    /// well-defined.
    InvalidK(i64),
    Other(String),
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::InvalidK(k) => write!(f, "invalid RRF k: {}", k),
            FusionError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for FusionError {}
