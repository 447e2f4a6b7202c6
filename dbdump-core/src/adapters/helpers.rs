//! Helper utilities for decoding catalog rows.
//!
//! Keeps error handling identical across the MySQL catalog queries.

use crate::{Result, error::DbDumpError};
use sqlx::{MySql, Row, mysql::MySqlRow};

/// Extension trait for extracting values from catalog rows with consistent
/// error context.
///
/// # Example
/// ```rust,ignore
/// use dbdump_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("TABLE_NAME", Some("INFORMATION_SCHEMA.TABLES"))?;
/// let ddl = row.get_text(1, "Create Table", Some("users"))?;
/// ```
pub trait RowExt {
    /// Extracts a typed field by column name.
    fn get_field<'r, T>(&'r self, field_name: &str, object_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>;

    /// Extracts a positional field as UTF-8 text regardless of the column's
    /// declared type (`SHOW CREATE ...` results report binary collations on
    /// some servers).
    fn get_text(&self, index: usize, field_name: &str, object_context: Option<&str>)
    -> Result<String>;
}

impl RowExt for MySqlRow {
    fn get_field<'r, T>(&'r self, field_name: &str, object_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
    {
        self.try_get(field_name)
            .map_err(|e| DbDumpError::parse_field(field_name, object_context, e))
    }

    fn get_text(
        &self,
        index: usize,
        field_name: &str,
        object_context: Option<&str>,
    ) -> Result<String> {
        let bytes: Vec<u8> = self
            .try_get_unchecked(index)
            .map_err(|e| DbDumpError::parse_field(field_name, object_context, e))?;
        String::from_utf8(bytes).map_err(|e| DbDumpError::parse_field(field_name, object_context, e))
    }
}
