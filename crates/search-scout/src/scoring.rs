//! Segment scoring (spec.md §4.6 step 4): 0/1 substring-containment
//! scoring against the query's lower-cased, whitespace-split term set.
//!
//! This is a deliberate deviation from the Python prototype's
//! whitespace-tokenized-*set-intersection* scoring (`MockScout._score_unit`):
//! spec.md's "any term occurs as a substring of the segment" is stricter
//! grammar than token-set intersection (a term need not be its own
//! whitespace-delimited token in the segment), so the Rust rewrite follows
//! spec.md's literal wording rather than the prototype's looser behavior.

use std::collections::HashSet;

/// Lower-cases and whitespace-splits `semantic_text` into a term set. An
/// empty query yields an empty set, which scores every segment 0.0.
pub fn query_terms(semantic_text: &str) -> HashSet<String> {
    semantic_text
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 1.0 if any term in `terms` occurs as a substring of `segment`
/// (case-insensitive), else 0.0.
pub fn score_segment(segment: &str, terms: &HashSet<String>) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let lower = segment.to_lowercase();
    if terms.iter().any(|term| lower.contains(term.as_str())) {
        1.0
    } else {
        0.0
    }
}
