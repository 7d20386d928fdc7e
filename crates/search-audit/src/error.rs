//! Error types for search-audit.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AuditError {
    /// The sink's downstream transport failed (network, disk, ...).
    Sink(String),
    Other(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::Sink(msg) => write!(f, "audit sink error: {}", msg),
            AuditError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for AuditError {}
