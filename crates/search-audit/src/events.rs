//! Event name constants for the systematic-mode audit bracket (spec.md §4.1
//! `ExecuteSystematic`).

/// Emitted once, before a systematic stream begins yielding hits.
pub const SYSTEMATIC_SEARCH_START: &str = "SYSTEMATIC_SEARCH_START";

/// Emitted once, when a systematic stream ends — on normal completion,
/// consumer-initiated early termination, or a propagated backend error.
pub const SYSTEMATIC_SEARCH_COMPLETE: &str = "SYSTEMATIC_SEARCH_COMPLETE";
