//! Row export: turns streamed rows into `INSERT` statements.

use std::io::Write;

use super::statements::write_data_header;
use crate::Result;
use crate::adapters::{RowSink, RowSource};
use crate::error::DbDumpError;
use crate::format::{SqlValue, format_value, quote_identifier};

/// Renders one row as a single-line `INSERT` statement.
pub fn build_insert_statement(table: &str, columns: &[String], values: &[SqlValue]) -> String {
    let mut statement = insert_prefix(table, columns);
    push_values(&mut statement, values);
    statement
}

fn insert_prefix(table: &str, columns: &[String]) -> String {
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES (",
        quote_identifier(table),
        column_list
    )
}

fn push_values(statement: &mut String, values: &[SqlValue]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            statement.push_str(", ");
        }
        statement.push_str(&format_value(value));
    }
    statement.push_str(");");
}

/// [`RowSink`] writing one `INSERT` line per row.
///
/// Each statement is written in full before the next row is accepted, so an
/// interrupted export leaves only complete statements behind.
pub struct InsertWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    table: String,
    prefix: String,
    rows: u64,
}

impl<'a, W: Write + ?Sized> InsertWriter<'a, W> {
    /// Creates a writer for `table` listing `columns` in every statement.
    pub fn new(out: &'a mut W, table: &str, columns: &[String]) -> Self {
        Self {
            out,
            table: table.to_string(),
            prefix: insert_prefix(table, columns),
            rows: 0,
        }
    }

    /// Statements written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl<W: Write + ?Sized> RowSink for InsertWriter<'_, W> {
    fn accept_row(&mut self, values: &[SqlValue]) -> Result<()> {
        let mut statement = self.prefix.clone();
        push_values(&mut statement, values);
        statement.push('\n');

        self.out.write_all(statement.as_bytes()).map_err(|e| {
            DbDumpError::io(
                format!("Failed to write INSERT statement for `{}`", self.table),
                e,
            )
        })?;
        self.rows = self.rows.saturating_add(1);
        Ok(())
    }
}

/// Writes the data section of `table`: its header followed by one `INSERT`
/// per row of `SELECT columns FROM table [WHERE filter]`.
///
/// Returns the number of rows written.
pub async fn export_table_data<S, W>(
    source: &mut S,
    out: &mut W,
    table: &str,
    columns: &[String],
    filter: Option<&str>,
) -> Result<u64>
where
    S: RowSource + ?Sized,
    W: Write + Send + ?Sized,
{
    write_data_header(out, table)
        .map_err(|e| DbDumpError::io(format!("Failed to write data header for `{}`", table), e))?;

    let mut writer = InsertWriter::new(out, table, columns);
    let streamed = source
        .stream_rows(table, columns, filter, &mut writer)
        .await?;
    tracing::trace!(
        "`{}`: {} rows streamed, {} written",
        table,
        streamed,
        writer.rows()
    );
    Ok(writer.rows())
}
