//! Catalog data returned by schema inspection.
//!
//! Nothing here outlives a single run; DDL strings are fetched on demand and
//! written straight to the dump.

/// `EXTRA` markers MySQL reports for computed columns.
///
/// `DEFAULT_GENERATED` only flags an expression default; those columns accept
/// explicit values.
const GENERATION_MARKERS: &[&str] = &["VIRTUAL GENERATED", "STORED GENERATED"];

/// A table column as seen by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Whether the engine computes the value (excluded from INSERTs)
    pub is_generated: bool,
}

impl Column {
    /// Builds a column from its name and the catalog `EXTRA` text.
    pub fn from_extra(name: impl Into<String>, extra: &str) -> Self {
        Self {
            name: name.into(),
            is_generated: is_generation_extra(extra),
        }
    }
}

/// True when a column's `EXTRA` metadata marks it as generated.
pub fn is_generation_extra(extra: &str) -> bool {
    let extra = extra.to_ascii_uppercase();
    GENERATION_MARKERS
        .iter()
        .any(|marker| extra.contains(marker))
}

/// Names of the columns that can be listed in an INSERT, in declaration order.
pub fn non_generated_columns(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .filter(|column| !column.is_generated)
        .map(|column| column.name.clone())
        .collect()
}

/// A view and its `CREATE VIEW` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInfo {
    /// View name
    pub name: String,
    /// `CREATE OR REPLACE` DDL with the definer set to `CURRENT_USER`
    pub ddl: String,
}

/// A trigger and its `CREATE TRIGGER` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerInfo {
    /// Trigger name
    pub name: String,
    /// Table the trigger is attached to
    pub table: String,
    /// DDL with the definer set to `CURRENT_USER`
    pub ddl: String,
}

/// Server facts written into the dump preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// `VERSION()`
    pub version: String,
    /// `@@character_set_server`
    pub charset: String,
    /// Session UTC offset, always signed (`+08:00`, `-05:00`)
    pub timezone: String,
}

impl ServerInfo {
    /// Normalizes the reported UTC offset to carry an explicit sign.
    pub fn signed_offset(offset: &str) -> String {
        let offset = offset.trim();
        if offset.starts_with('-') || offset.starts_with('+') {
            offset.to_string()
        } else {
            format!("+{}", offset)
        }
    }
}
