//! # search-rank
//!
//! The unified entry point for the hybrid retrieval pipeline: a facade over
//! the `search-*` crates plus the [`pipeline::Orchestrator`] that composes
//! them into `Execute`/`ExecuteSystematic`.
//!
//! # Architecture
//!
//! - [`search_retrieve`]: the shared data model and the dense/sparse/graph
//!   strategy adapters. Fast, coarse-grained first-stage retrieval.
//! - [`search_fusion`]: Reciprocal Rank Fusion across strategy result lists.
//! - [`search_rerank`]: bounded re-scoring of the fused candidate window.
//! - [`search_scout`]: context distillation down to query-relevant sentences.
//! - [`search_audit`]: the audit sink and provenance hashing that
//!   systematic-mode runs are built around.
//! - [`search_config`]: layered configuration for all of the above.
//!
//! [`pipeline::Orchestrator`] is the composition root: construct one via
//! [`pipeline::Orchestrator::builder`], wiring in whichever strategies and
//! collaborators a deployment needs, then call
//! [`pipeline::Orchestrator::execute`] or
//! [`pipeline::Orchestrator::execute_systematic`].

mod error;

pub mod pipeline;

pub use error::OrchestratorError;

/// Re-exports of the retrieval data model and strategy adapters.
pub mod retrieve {
    pub use search_retrieve::*;
}

/// Re-exports of Reciprocal Rank Fusion.
pub mod fusion {
    pub use search_fusion::*;
}

/// Re-exports of the re-ranking stage.
pub mod rerank {
    pub use search_rerank::*;
}

/// Re-exports of context distillation.
pub mod scout {
    pub use search_scout::*;
}

/// Re-exports of audit events and provenance hashing.
pub mod audit {
    pub use search_audit::*;
}

/// Re-exports of layered configuration.
pub mod config {
    pub use search_config::*;
}

#[cfg(feature = "http")]
pub mod http;

pub mod mocks;

pub mod prelude {
    pub use crate::retrieve::prelude::*;

    pub use crate::fusion::{rrf, rrf_k, RrfConfig, FusionError, DEFAULT_K};

    pub use crate::rerank::{HeuristicReranker, NullReranker, Reranker, RerankError};

    pub use crate::scout::{Scout, ScoutConfig, ScoutError};

    pub use crate::audit::{
        AuditSink, RecordingAuditSink, TracingAuditSink, AuditError,
        SYSTEMATIC_SEARCH_COMPLETE, SYSTEMATIC_SEARCH_START,
    };

    pub use crate::config::AppConfig;

    pub use crate::pipeline::{Orchestrator, OrchestratorBuilder};

    pub use crate::OrchestratorError;
}
