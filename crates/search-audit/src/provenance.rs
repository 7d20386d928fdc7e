//! Deterministic provenance hashing (spec.md §3): a SHA-256 hex digest over
//! the query text and the final ordered `doc_id` list, so two runs over the
//! same request and the same final hit order are byte-equal (spec.md §8
//! property 5).

use sha2::{Digest, Sha256};

/// `SHA-256(query_text || "[" || doc_ids_in_order || "]")`, hex-encoded.
///
/// `doc_ids_in_order` is rendered as a comma-joined list with no surrounding
/// whitespace — any deterministic rendering satisfies spec.md's literal
/// grammar, and a comma join keeps the preimage free of ambiguity between an
/// id containing a space and a separator.
pub fn provenance_hash<I, S>(query_text: &str, doc_ids_in_order: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = doc_ids_in_order
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",");

    let mut hasher = Sha256::new();
    hasher.update(query_text.as_bytes());
    hasher.update(b"[");
    hasher.update(joined.as_bytes());
    hasher.update(b"]");
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let a = provenance_hash("covid vaccine", ["doc1", "doc2"]);
        let b = provenance_hash("covid vaccine", ["doc1", "doc2"]);
        assert_eq!(a, b);
    }

    #[test]
    fn order_sensitive() {
        let a = provenance_hash("q", ["doc1", "doc2"]);
        let b = provenance_hash("q", ["doc2", "doc1"]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_id_list_still_well_formed() {
        let hash = provenance_hash("q", Vec::<String>::new());
        assert_eq!(hash.len(), 64);
    }
}
