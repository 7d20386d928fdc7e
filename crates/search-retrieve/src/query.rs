//! Query normalization: turning a [`Query`] into the semantic string used
//! by dense/graph strategies, and into the field-qualified boolean
//! expression used by the sparse/FTS strategy.
//!
//! The PubMed-style tag grammar is a single left-to-right scan over the
//! input rather than a `regex` dependency — the grammar (quoted phrases,
//! `[Tag]` suffixes, slash-separated tags) is simple enough for hand-rolled
//! token scanning, matching the rest of this crate's avoidance of `regex`
//! where a scanner suffices.

use crate::types::Query;

/// The shared text-normalization rule: delegates to [`Query::to_text`].
pub fn to_semantic_text(query: &Query) -> String {
    query.to_text()
}

/// §4.2's sparse-expression translation.
pub fn to_sparse_expression(query: &Query) -> String {
    match query {
        Query::Fields(map) => map
            .iter()
            .map(|(field, value)| format!("{}:{}", field, value))
            .collect::<Vec<_>>()
            .join(" AND "),
        Query::Text(text) => translate_pubmed(text),
    }
}

fn translate_pubmed(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            let (phrase, next) = scan_quoted(&chars, i);
            i = next;
            emit_term(&mut out, &phrase, &chars, &mut i);
        } else if c == '(' || c == ')' {
            out.push(c);
            i += 1;
        } else if c.is_whitespace() {
            out.push(c);
            i += 1;
        } else {
            let (word, next) = scan_bareword(&chars, i);
            i = next;
            emit_term(&mut out, &word, &chars, &mut i);
        }
    }

    out
}

/// Scans a quoted phrase (including its surrounding quotes, which the
/// output must preserve) starting at `start` (pointing at the opening `"`).
fn scan_quoted(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start + 1;
    while i < chars.len() && chars[i] != '"' {
        i += 1;
    }
    if i < chars.len() {
        i += 1; // include the closing quote
    }
    (chars[start..i].iter().collect(), i)
}

/// Scans a bareword: runs until whitespace, a parenthesis, or a `[` tag
/// opener.
fn scan_bareword(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '(' && chars[i] != ')' && chars[i] != '[' {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

/// If `term` is immediately followed by `[Tag]`, qualify it with the
/// canonical field(s) for that tag and advance `i` past the bracket;
/// otherwise emit `term` unqualified.
fn emit_term(out: &mut String, term: &str, chars: &[char], i: &mut usize) {
    if *i < chars.len() && chars[*i] == '[' {
        let tag_start = *i + 1;
        let mut j = tag_start;
        while j < chars.len() && chars[j] != ']' {
            j += 1;
        }
        let tag: String = chars[tag_start..j].iter().collect();
        *i = if j < chars.len() { j + 1 } else { j };
        let fields = canonical_fields(&tag);
        out.push_str(&qualify(term, &fields));
    } else {
        out.push_str(term);
    }
}

/// `(field1:TERM OR field2:TERM OR ...)` when multiple fields apply, else
/// `field:TERM`.
fn qualify(term: &str, fields: &[String]) -> String {
    match fields {
        [field] => format!("{}:{}", field, term),
        _ => format!(
            "({})",
            fields
                .iter()
                .map(|f| format!("{}:{}", f, term))
                .collect::<Vec<_>>()
                .join(" OR ")
        ),
    }
}

/// Canonical tag table (§4.2), including slash-separated tag expansion
/// (`Title/Abstract` -> `["title", "abstract"]`) and `tiab`'s built-in
/// title+abstract expansion.
fn canonical_fields(tag: &str) -> Vec<String> {
    let mut fields = Vec::new();
    for part in tag.split('/') {
        for field in canonical_field(part) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    fields
}

fn canonical_field(tag: &str) -> Vec<String> {
    match tag.trim().to_lowercase().as_str() {
        "ti" | "title" => vec!["title".to_string()],
        "ab" | "abstract" => vec!["abstract".to_string()],
        "tiab" => vec!["title".to_string(), "abstract".to_string()],
        "mh" | "mesh" => vec!["mesh_terms".to_string()],
        other => vec![other.to_string()],
    }
}
