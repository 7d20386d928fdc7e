//! Metadata predicate tree evaluation.
//!
//! Evaluates a document-style predicate tree — comparison and logical
//! operators, dotted field paths — against a JSON metadata mapping.
//!
//! - **Filters**: narrow a query's candidate set (e.g. `{"year": {"$gt": 2020}}`).
//! - Predicate trees are stored untyped on `SearchRequest::filters` and
//!   parsed into [`Filter`] on first use so malformed JSON surfaces as an
//!   `InvalidFilter` error rather than a panic.

use crate::RetrieveError;
use serde_json::Value;

/// A parsed predicate tree.
#[derive(Clone, Debug)]
pub enum Filter {
    /// `{field: value}` or `{field: {op: target, ...}}`; multiple operators
    /// on one field are ANDed together (spec.md §4.3's "per-operator check").
    Field { path: String, ops: Vec<Op> },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    /// An implicit-AND node: multiple field/logical keys co-resident in one
    /// JSON object.
    All(Vec<Filter>),
}

#[derive(Clone, Debug)]
pub enum Op {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Value),
    Nin(Value),
    /// Unknown operator: treated as always-true.
    Unknown,
}

impl Filter {
    /// Parse a JSON predicate tree.
    pub fn parse(value: &Value) -> Result<Self, RetrieveError> {
        let obj = value.as_object().ok_or_else(|| {
            RetrieveError::InvalidFilter("filter node must be a JSON object".into())
        })?;

        let mut entries = Vec::with_capacity(obj.len());
        for (key, val) in obj {
            entries.push(Self::parse_entry(key, val)?);
        }

        match entries.len() {
            0 => Ok(Filter::All(Vec::new())),
            1 => Ok(entries.into_iter().next().unwrap()),
            _ => Ok(Filter::All(entries)),
        }
    }

    fn parse_entry(key: &str, val: &Value) -> Result<Self, RetrieveError> {
        match key {
            "$or" => Ok(Filter::Or(Self::parse_list(val)?)),
            "$and" => Ok(Filter::And(Self::parse_list(val)?)),
            "$not" => Ok(Filter::Not(Box::new(Filter::parse(val)?))),
            field => Ok(Filter::Field {
                path: field.to_string(),
                ops: Self::parse_ops(val),
            }),
        }
    }

    /// A non-list `$or`/`$and` operand always fails to match, modeled as
    /// a predicate list containing a single always-false node.
    fn parse_list(val: &Value) -> Result<Vec<Filter>, RetrieveError> {
        match val.as_array() {
            Some(items) => items.iter().map(Filter::parse).collect(),
            None => Ok(vec![Filter::Or(Vec::new())]),
        }
    }

    fn parse_ops(val: &Value) -> Vec<Op> {
        if let Some(obj) = val.as_object() {
            // `{field: {op: target, ...}}` — a nested object node is only
            // treated as an operator map if every key is a recognized `$op`.
            let is_op_map = !obj.is_empty() && obj.keys().all(|k| k.starts_with('$'));
            if is_op_map {
                // Every operator present is a separate check, ANDed together
                // (spec.md §4.3: "per-operator check"), not just the first.
                return obj
                    .iter()
                    .map(|(op, target)| match op.as_str() {
                        "$eq" => Op::Eq(target.clone()),
                        "$ne" => Op::Ne(target.clone()),
                        "$gt" => Op::Gt(target.clone()),
                        "$gte" => Op::Gte(target.clone()),
                        "$lt" => Op::Lt(target.clone()),
                        "$lte" => Op::Lte(target.clone()),
                        "$in" => Op::In(target.clone()),
                        "$nin" => Op::Nin(target.clone()),
                        _ => Op::Unknown,
                    })
                    .collect();
            }
        }
        vec![Op::Eq(val.clone())]
    }

    /// Evaluate against a metadata mapping.
    pub fn matches(&self, metadata: &Value) -> bool {
        match self {
            Filter::Field { path, ops } => {
                let found = resolve_path(metadata, path);
                ops.iter().all(|op| eval_op(op, found.as_ref()))
            }
            Filter::And(preds) => preds.iter().all(|p| p.matches(metadata)),
            Filter::Or(preds) => preds.iter().any(|p| p.matches(metadata)),
            Filter::Not(pred) => !pred.matches(metadata),
            Filter::All(preds) => preds.iter().all(|p| p.matches(metadata)),
        }
    }
}

/// Dotted-path navigation; missing path -> `None` (treated as JSON `null`).
fn resolve_path<'a>(metadata: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = metadata;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn eval_op(op: &Op, found: Option<&Value>) -> bool {
    let found = found.unwrap_or(&Value::Null);
    match op {
        Op::Eq(target) => value_eq(found, target),
        Op::Ne(target) => !value_eq(found, target),
        Op::Gt(target) => compare(found, target).map(|o| o.is_gt()).unwrap_or(false),
        Op::Gte(target) => compare(found, target).map(|o| o.is_ge()).unwrap_or(false),
        Op::Lt(target) => compare(found, target).map(|o| o.is_lt()).unwrap_or(false),
        Op::Lte(target) => compare(found, target).map(|o| o.is_le()).unwrap_or(false),
        Op::In(target) => match target.as_array() {
            Some(items) => items.iter().any(|v| value_eq(found, v)),
            None => value_eq(found, target),
        },
        Op::Nin(target) => match target.as_array() {
            Some(items) => !items.iter().any(|v| value_eq(found, v)),
            None => !value_eq(found, target),
        },
        Op::Unknown => true,
    }
}

/// Equality semantics that also satisfy "scalar predicate value matches if
/// scalar is a member of a list-valued metadata field" (spec.md §4.3).
fn value_eq(found: &Value, target: &Value) -> bool {
    if found == target {
        return true;
    }
    if let Some(items) = found.as_array() {
        if !target.is_array() {
            return items.iter().any(|v| v == target);
        }
    }
    false
}

/// `null` never compares true; mismatched-type comparisons return false
/// rather than raising (spec.md §4.3's "type-safe" requirement).
fn compare(found: &Value, target: &Value) -> Option<std::cmp::Ordering> {
    if found.is_null() || target.is_null() {
        return None;
    }
    if let (Some(a), Some(b)) = (found.as_f64(), target.as_f64()) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (found.as_str(), target.as_str()) {
        return Some(a.cmp(b));
    }
    if let (Some(a), Some(b)) = (found.as_bool(), target.as_bool()) {
        return Some(a.cmp(&b));
    }
    None
}
