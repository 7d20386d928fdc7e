//! The persisted document row schema (spec.md §6), carried as ambient
//! data-layer hygiene even though this crate does not itself persist
//! documents — it is exercised by the in-memory `VectorStore`/`FTSStore`
//! reference implementations used in tests and examples.
//!
//! Grounded in the Python prototype's `db.py::DocumentSchema`
//! (a `LanceModel` with optional `title`/`abstract` columns added after the
//! table's original creation).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One row as persisted by the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    pub doc_id: String,
    pub vector: Vec<f32>,
    pub content: String,
    /// Added in a later schema revision; absent in rows written by the
    /// original table.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub abstract_: Option<String>,
    /// JSON-stringified metadata.
    pub metadata: String,
}

/// The set of columns a table physically carries, used to decide whether
/// writing a `DocumentRow` into it is safe.
#[derive(Debug, Clone, Default)]
pub struct TableColumns {
    pub has_title: bool,
    pub has_abstract: bool,
}

impl TableColumns {
    /// A table created by the original schema, missing `title`/`abstract`.
    pub fn legacy() -> Self {
        Self {
            has_title: false,
            has_abstract: false,
        }
    }

    /// A table created by the current schema.
    pub fn current() -> Self {
        Self {
            has_title: true,
            has_abstract: true,
        }
    }
}

/// Reading a row from a table missing `title`/`abstract` must succeed with
/// those fields `None` (spec.md §6) — `DocumentRow`'s `#[serde(default)]`
/// already guarantees this at the deserialization layer; this helper exists
/// so callers can assert the contract without constructing JSON by hand.
pub fn read_compatible(columns: &TableColumns, row: &DocumentRow) -> Result<(), ConfigError> {
    if !columns.has_title && row.title.is_some() {
        return Err(ConfigError::SchemaMigration(
            "row carries a title but the table predates the title column".into(),
        ));
    }
    if !columns.has_abstract && row.abstract_.is_some() {
        return Err(ConfigError::SchemaMigration(
            "row carries an abstract but the table predates the abstract column".into(),
        ));
    }
    Ok(())
}

/// Writing a newer schema onto an older table must fail loudly rather than
/// silently corrupt (spec.md §6/§7): a row that populates `title`/
/// `abstract` cannot be written into a table whose columns predate them.
pub fn check_write_compatible(columns: &TableColumns, row: &DocumentRow) -> Result<(), ConfigError> {
    if row.title.is_some() && !columns.has_title {
        return Err(ConfigError::SchemaMigration(
            "cannot write a title column into a table created before schema v2".into(),
        ));
    }
    if row.abstract_.is_some() && !columns.has_abstract {
        return Err(ConfigError::SchemaMigration(
            "cannot write an abstract column into a table created before schema v2".into(),
        ));
    }
    Ok(())
}
