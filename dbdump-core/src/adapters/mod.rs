//! Database adapter traits for schema inspection and row streaming.
//!
//! The orchestrator only talks to these traits, so the MySQL implementation
//! can be swapped for an in-memory catalog in tests.
//!
//! # Module Structure
//! - `config`: `ConnectionConfig` and `DumpOptions`
//! - `helpers`: row decoding helpers shared by the MySQL queries
//! - `mysql`: the `sqlx` MySQL adapter

use crate::Result;
use crate::format::SqlValue;
use crate::models::{Column, ServerInfo, TriggerInfo, ViewInfo};
use async_trait::async_trait;

pub mod config;
pub mod helpers;
pub mod mysql;

pub use config::{ConnectionConfig, DumpOptions};

/// Catalog queries against the configured database.
///
/// Every method issues its metadata queries on the adapter's single
/// connection and fails with `DbDumpError::SchemaQuery` on query or scan
/// failure.
#[async_trait]
pub trait SchemaInspector: Send {
    /// Server version, character set and session UTC offset.
    async fn server_info(&mut self) -> Result<ServerInfo>;

    /// Base tables of the configured database (views excluded).
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Columns of `table` in declaration order, with their generated flag.
    async fn analyze_columns(&mut self, table: &str) -> Result<Vec<Column>>;

    /// `CREATE TABLE` text as reported by the engine.
    async fn table_ddl(&mut self, table: &str) -> Result<String>;

    /// `CREATE DATABASE` text as reported by the engine.
    async fn database_ddl(&mut self, database: &str) -> Result<String>;

    /// Every view of the configured database with its DDL.
    async fn all_view_ddl(&mut self) -> Result<Vec<ViewInfo>>;

    /// Every trigger of `database` with its DDL.
    async fn all_triggers_ddl(&mut self, database: &str) -> Result<Vec<TriggerInfo>>;
}

/// Receives exported rows one at a time.
pub trait RowSink {
    /// Handles one row; values follow the requested column order.
    fn accept_row(&mut self, values: &[SqlValue]) -> Result<()>;
}

/// Streams table rows without materializing the result set.
#[async_trait]
pub trait RowSource: Send {
    /// Selects `columns` from `table` (optionally filtered by `filter`) and
    /// hands every row to `sink` as soon as it is decoded.
    ///
    /// Returns the number of rows delivered. Any fetch or decode failure
    /// aborts the stream with `DbDumpError::DataQuery`; rows already handed to
    /// the sink stay delivered.
    async fn stream_rows(
        &mut self,
        table: &str,
        columns: &[String],
        filter: Option<&str>,
        sink: &mut (dyn RowSink + Send),
    ) -> Result<u64>;
}

/// Everything the dump orchestrator needs from a database.
pub trait DumpSource: SchemaInspector + RowSource {}

impl<T: SchemaInspector + RowSource> DumpSource for T {}
