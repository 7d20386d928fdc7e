//! Audit events and provenance hashing for the hybrid retrieval pipeline.
//!
//! Two small concerns live here, kept together because both exist to make
//! the pipeline's output reproducible and inspectable after the fact:
//!
//! - [`sink`]: the [`AuditSink`] trait systematic-mode runs bracket with
//!   `SYSTEMATIC_SEARCH_START`/`SYSTEMATIC_SEARCH_COMPLETE` events, plus a
//!   `tracing`-backed reference implementation.
//! - [`provenance`]: the SHA-256 provenance hash every [`SearchResponse`]
//!   carries over its query text and final hit order.
//!
//! [`SearchResponse`]: search_retrieve::SearchResponse

pub mod error;
pub mod events;
pub mod provenance;
pub mod sink;

pub use error::AuditError;
pub use events::{SYSTEMATIC_SEARCH_COMPLETE, SYSTEMATIC_SEARCH_START};
pub use provenance::provenance_hash;
pub use sink::{AuditSink, RecordingAuditSink, TracingAuditSink};
