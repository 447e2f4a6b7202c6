//! MySQL catalog queries.
//!
//! Name lists come from `INFORMATION_SCHEMA` through prepared statements with
//! bound schema names. DDL text comes from `SHOW CREATE ...`, which takes
//! quoted identifiers instead of placeholders.

use super::ddl::{portable_view_ddl, rewrite_definer};
use crate::Result;
use crate::adapters::helpers::RowExt;
use crate::error::DbDumpError;
use crate::format::quote_identifier;
use crate::models::{Column, TriggerInfo, ViewInfo};
use sqlx::MySqlConnection;
use sqlx::mysql::MySqlRow;

/// Base tables of `database`, alphabetically.
pub(crate) async fn list_tables(conn: &mut MySqlConnection, database: &str) -> Result<Vec<String>> {
    let query = r#"
        SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME
        FROM INFORMATION_SCHEMA.TABLES
        WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    let rows = sqlx::query(query)
        .bind(database)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            DbDumpError::schema_query_failed(
                format!("Failed to enumerate tables in `{}`", database),
                e,
            )
        })?;

    tracing::debug!("Found {} base tables in `{}`", rows.len(), database);

    rows.iter()
        .map(|row| row.get_field::<String>("TABLE_NAME", Some("INFORMATION_SCHEMA.TABLES")))
        .collect()
}

/// Columns of `table` in ordinal order.
///
/// A table that does not exist yields an empty list.
pub(crate) async fn analyze_columns(
    conn: &mut MySqlConnection,
    database: &str,
    table: &str,
) -> Result<Vec<Column>> {
    let query = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR) AS COLUMN_NAME,
            CAST(EXTRA AS CHAR) AS EXTRA
        FROM INFORMATION_SCHEMA.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    let rows = sqlx::query(query)
        .bind(database)
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            DbDumpError::schema_query_failed(
                format!("Failed to analyze columns of `{}`", table),
                e,
            )
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("COLUMN_NAME", Some(table))?;
        let extra: Option<String> = row.get_field("EXTRA", Some(table))?;
        columns.push(Column::from_extra(name, extra.as_deref().unwrap_or_default()));
    }

    Ok(columns)
}

/// `SHOW CREATE TABLE` text for `table`.
pub(crate) async fn table_ddl(
    conn: &mut MySqlConnection,
    database: &str,
    table: &str,
) -> Result<String> {
    let query = format!(
        "SHOW CREATE TABLE {}.{}",
        quote_identifier(database),
        quote_identifier(table)
    );
    let row = show_create(conn, &query, table).await?;
    row.get_text(1, "Create Table", Some(table))
}

/// `SHOW CREATE DATABASE` text for `database`.
pub(crate) async fn database_ddl(conn: &mut MySqlConnection, database: &str) -> Result<String> {
    let query = format!("SHOW CREATE DATABASE {}", quote_identifier(database));
    let row = show_create(conn, &query, database).await?;
    row.get_text(1, "Create Database", Some(database))
}

/// Every view of `database` with replayable DDL.
pub(crate) async fn all_view_ddl(
    conn: &mut MySqlConnection,
    database: &str,
) -> Result<Vec<ViewInfo>> {
    let query = r#"
        SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME
        FROM INFORMATION_SCHEMA.VIEWS
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME
    "#;

    let rows = sqlx::query(query)
        .bind(database)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            DbDumpError::schema_query_failed(
                format!("Failed to enumerate views in `{}`", database),
                e,
            )
        })?;

    let names = rows
        .iter()
        .map(|row| row.get_field::<String>("TABLE_NAME", Some("INFORMATION_SCHEMA.VIEWS")))
        .collect::<Result<Vec<_>>>()?;

    let mut views = Vec::with_capacity(names.len());
    for name in names {
        let query = format!(
            "SHOW CREATE VIEW {}.{}",
            quote_identifier(database),
            quote_identifier(&name)
        );
        let row = show_create(conn, &query, &name).await?;
        let ddl = row.get_text(1, "Create View", Some(&name))?;
        views.push(ViewInfo {
            ddl: portable_view_ddl(&ddl),
            name,
        });
    }

    tracing::debug!("Collected {} views from `{}`", views.len(), database);
    Ok(views)
}

/// Every trigger of `database` with replayable DDL, grouped by table in
/// firing order.
pub(crate) async fn all_triggers_ddl(
    conn: &mut MySqlConnection,
    database: &str,
) -> Result<Vec<TriggerInfo>> {
    let query = r#"
        SELECT
            CAST(TRIGGER_NAME AS CHAR) AS TRIGGER_NAME,
            CAST(EVENT_OBJECT_TABLE AS CHAR) AS EVENT_OBJECT_TABLE
        FROM INFORMATION_SCHEMA.TRIGGERS
        WHERE TRIGGER_SCHEMA = ?
        ORDER BY EVENT_OBJECT_TABLE, ACTION_ORDER
    "#;

    let rows = sqlx::query(query)
        .bind(database)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            DbDumpError::schema_query_failed(
                format!("Failed to enumerate triggers in `{}`", database),
                e,
            )
        })?;

    let mut found = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("TRIGGER_NAME", Some("INFORMATION_SCHEMA.TRIGGERS"))?;
        let table: String =
            row.get_field("EVENT_OBJECT_TABLE", Some("INFORMATION_SCHEMA.TRIGGERS"))?;
        found.push((name, table));
    }

    let mut triggers = Vec::with_capacity(found.len());
    for (name, table) in found {
        let query = format!(
            "SHOW CREATE TRIGGER {}.{}",
            quote_identifier(database),
            quote_identifier(&name)
        );
        let row = show_create(conn, &query, &name).await?;
        // Trigger, sql_mode, SQL Original Statement, ...
        let ddl = row.get_text(2, "SQL Original Statement", Some(&name))?;
        triggers.push(TriggerInfo {
            ddl: rewrite_definer(&ddl),
            name,
            table,
        });
    }

    tracing::debug!("Collected {} triggers from `{}`", triggers.len(), database);
    Ok(triggers)
}

async fn show_create(conn: &mut MySqlConnection, query: &str, object: &str) -> Result<MySqlRow> {
    sqlx::query(query)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbDumpError::schema_query_failed(format!("`{}` failed for `{}`", query, object), e))
}
