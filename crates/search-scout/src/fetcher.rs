//! `FetcherHook(source_pointer, user_context) -> string | null` (spec.md
//! §6): an optional, lazily-invoked JIT content source.
//!
//! Identity is never interpreted here — `user_context` is forwarded
//! opaquely from the request, matching spec.md §9's "Identity is never
//! interpreted by the pipeline."

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::ScoutError;

#[async_trait]
pub trait FetcherHook: Send + Sync {
    async fn fetch(
        &self,
        source_pointer: &Map<String, Value>,
        user_context: Option<&Value>,
    ) -> Result<Option<String>, ScoutError>;
}
