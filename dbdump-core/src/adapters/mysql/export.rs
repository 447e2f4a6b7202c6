//! Streaming table data out of MySQL.
//!
//! The data `SELECT` runs over the text protocol, so every non-NULL value
//! arrives as its textual rendering; the column type decides how that text is
//! classified.

use crate::Result;
use crate::adapters::RowSink;
use crate::error::DbDumpError;
use crate::format::{SqlValue, quote_identifier};
use crate::validation::check_where_clause;
use futures::TryStreamExt;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, MySqlConnection, Row, TypeInfo, ValueRef};

/// How a column's textual value is turned into a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Integer,
    Float,
    Text,
}

impl ValueKind {
    fn for_type(type_name: &str) -> Self {
        let base = type_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match base.as_str() {
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
                Self::Integer
            }
            "FLOAT" | "DOUBLE" | "REAL" => Self::Float,
            _ => Self::Text,
        }
    }
}

/// Builds the data `SELECT` for `table`.
///
/// `filter` is appended verbatim after `WHERE`.
pub fn select_query(table: &str, columns: &[String], filter: Option<&str>) -> String {
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = format!("SELECT {} FROM {}", column_list, quote_identifier(table));
    if let Some(filter) = filter {
        query.push_str(" WHERE ");
        query.push_str(filter);
    }
    query
}

/// Classifies the raw text of a value reported with MySQL type `type_name`.
///
/// Integer columns become `Integer` and `FLOAT`/`DOUBLE` become `Float` when
/// the text parses (`BIGINT UNSIGNED` values above `i64::MAX` stay text).
/// Everything else is text, or bytes when it is not valid UTF-8.
pub fn classify(type_name: &str, bytes: Vec<u8>) -> SqlValue {
    let parsed = match ValueKind::for_type(type_name) {
        ValueKind::Integer => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .map(SqlValue::Integer),
        ValueKind::Float => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .map(SqlValue::Float),
        ValueKind::Text => None,
    };
    parsed.unwrap_or_else(|| SqlValue::from_bytes(bytes))
}

/// Decodes column `index` of a text-protocol row.
pub fn decode_value(row: &MySqlRow, index: usize) -> std::result::Result<SqlValue, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = row.column(index).type_info().name().to_string();
    let bytes: Vec<u8> = row.try_get_unchecked(index)?;
    Ok(classify(&type_name, bytes))
}

/// Streams `columns` of `table` into `sink`, one row at a time.
///
/// A filter that would add a second statement is refused before anything is
/// sent to the server.
pub(crate) async fn stream_rows(
    conn: &mut MySqlConnection,
    table: &str,
    columns: &[String],
    filter: Option<&str>,
    sink: &mut (dyn RowSink + Send),
) -> Result<u64> {
    if let Some(filter) = filter {
        check_where_clause(filter)?;
    }
    let query = select_query(table, columns, filter);
    tracing::debug!("Exporting `{}` ({} columns)", table, columns.len());

    let mut rows = sqlx::raw_sql(&query).fetch(&mut *conn);
    let mut values = Vec::with_capacity(columns.len());
    let mut count: u64 = 0;

    while let Some(row) = rows.try_next().await.map_err(|e| {
        DbDumpError::data_query_failed(format!("Failed to fetch rows from `{}`", table), e)
    })? {
        values.clear();
        for index in 0..row.len() {
            let value = decode_value(&row, index).map_err(|e| {
                DbDumpError::data_query_failed(
                    format!("Failed to decode column {} of `{}`", index, table),
                    e,
                )
            })?;
            values.push(value);
        }
        sink.accept_row(&values)?;
        count = count.saturating_add(1);
    }

    tracing::debug!("Exported {} rows from `{}`", count, table);
    Ok(count)
}
