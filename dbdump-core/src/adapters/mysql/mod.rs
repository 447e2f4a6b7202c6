//! MySQL database adapter over a single connection.
//!
//! # Module Structure
//! - `connection`: connect, ping, close and server facts
//! - `schema_collection`: table, column, view and trigger catalog queries
//! - `export`: streaming `SELECT` and row value decoding
//! - `ddl`: definer and `CREATE OR REPLACE` rewrites applied to view and trigger DDL
//!
//! # Guarantees
//! - Only `SELECT` and `SHOW` statements are issued
//! - The password never appears in `Debug` output or error messages
//! - Result sets are scoped to the call that opened them

pub mod connection;
pub mod ddl;
pub mod export;
pub mod schema_collection;


use super::{RowSink, RowSource, SchemaInspector};
use crate::Result;
use crate::models::{Column, ServerInfo, TriggerInfo, ViewInfo};
use async_trait::async_trait;
use sqlx::MySqlConnection;

pub use connection::connect_options;
pub use export::{decode_value, select_query};

/// MySQL adapter holding the one connection used for a whole dump run.
pub struct MySqlAdapter {
    conn: MySqlConnection,
    database: String,
}

impl std::fmt::Debug for MySqlAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlAdapter")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SchemaInspector for MySqlAdapter {
    async fn server_info(&mut self) -> Result<ServerInfo> {
        connection::fetch_server_info(&mut self.conn).await
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        schema_collection::list_tables(&mut self.conn, &self.database).await
    }

    async fn analyze_columns(&mut self, table: &str) -> Result<Vec<Column>> {
        schema_collection::analyze_columns(&mut self.conn, &self.database, table).await
    }

    async fn table_ddl(&mut self, table: &str) -> Result<String> {
        schema_collection::table_ddl(&mut self.conn, &self.database, table).await
    }

    async fn database_ddl(&mut self, database: &str) -> Result<String> {
        schema_collection::database_ddl(&mut self.conn, database).await
    }

    async fn all_view_ddl(&mut self) -> Result<Vec<ViewInfo>> {
        schema_collection::all_view_ddl(&mut self.conn, &self.database).await
    }

    async fn all_triggers_ddl(&mut self, database: &str) -> Result<Vec<TriggerInfo>> {
        schema_collection::all_triggers_ddl(&mut self.conn, database).await
    }
}

#[async_trait]
impl RowSource for MySqlAdapter {
    async fn stream_rows(
        &mut self,
        table: &str,
        columns: &[String],
        filter: Option<&str>,
        sink: &mut (dyn RowSink + Send),
    ) -> Result<u64> {
        export::stream_rows(&mut self.conn, table, columns, filter, sink).await
    }
}
