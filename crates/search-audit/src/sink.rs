//! `AuditSink` (spec.md §6): a synchronous-contract, structured event
//! consumer. Modeled as an async trait since a real sink (a message queue, a
//! reproducibility service) is typically I/O-bound; the contract's
//! synchronicity is about ordering (the caller awaits each `log` before
//! proceeding), not about blocking the executor.

use async_trait::async_trait;
use serde_json::Value;

use crate::AuditError;

/// `AuditSink.Log(event_name, payload)` (spec.md §6). Failures propagate —
/// callers in systematic mode must not swallow them (spec.md §4.1 step 2).
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn log(&self, event: &str, payload: Value) -> Result<(), AuditError>;
}

/// Structured-logging sink, generalizing the Python prototype's
/// `MockVeritasClient` (`VERITAS_AUDIT: {...}` log lines) into a `tracing`
/// event carrying the same `component`/`event`/`data` shape.
pub struct TracingAuditSink {
    component: String,
}

impl TracingAuditSink {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl Default for TracingAuditSink {
    fn default() -> Self {
        Self::new("search-rank")
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn log(&self, event: &str, payload: Value) -> Result<(), AuditError> {
        tracing::info!(
            component = %self.component,
            event,
            data = %payload,
            "audit event"
        );
        Ok(())
    }
}

/// In-memory sink for tests and local development: records every event in
/// call order.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: tokio::sync::Mutex<Vec<(String, Value)>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn log(&self, event: &str, payload: Value) -> Result<(), AuditError> {
        self.events.lock().await.push((event.to_string(), payload));
        Ok(())
    }
}
