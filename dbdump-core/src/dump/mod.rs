//! Dump orchestration.
//!
//! [`run_dump`] drives a whole dump against any [`DumpSource`]:
//!
//! 1. read server facts and reject servers older than MySQL 8
//! 2. write the preamble and the database block
//! 3. resolve the effective table set
//! 4. per table: structure, then data
//! 5. optionally triggers and views
//! 6. write the trailer and flush
//!
//! The first failure aborts the run. Everything written before it stays in
//! the output, and every statement in it is complete.

pub mod exporter;
pub mod statements;


use std::collections::HashSet;
use std::io::Write;

use crate::Result;
use crate::adapters::mysql::MySqlAdapter;
use crate::adapters::{ConnectionConfig, DumpOptions, DumpSource};
use crate::error::{DbDumpError, error_chain};
use crate::logging::DumpLogger;
use crate::models::non_generated_columns;
use crate::validation::{check_server_version, check_where_clause};

pub use exporter::{InsertWriter, build_insert_statement, export_table_data};

/// Where the dump comes from, as shown in the preamble.
#[derive(Debug, Clone, Copy)]
pub struct DumpTarget<'a> {
    /// Server host name
    pub host: &'a str,
    /// Database being dumped
    pub database: &'a str,
}

/// What a completed run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Tables processed, in dump order
    pub tables: Vec<String>,
    /// Tables whose data section was written
    pub tables_with_data: usize,
    /// Total `INSERT` statements written
    pub rows: u64,
    /// Views written
    pub views: usize,
    /// Triggers written
    pub triggers: usize,
}

/// Connects with `config`, dumps the configured database into `out` and
/// closes the connection.
///
/// The connection is closed whether or not the dump succeeded; a failure to
/// close is logged and does not fail an otherwise successful run.
///
/// # Errors
/// Returns the first error of the run: configuration, connection, version,
/// catalog, data or output.
pub async fn dump_database<W: Write + Send + ?Sized>(
    config: &ConnectionConfig,
    options: &DumpOptions,
    out: &mut W,
    logger: &dyn DumpLogger,
) -> Result<DumpSummary> {
    let database = config.require_database()?.to_string();
    if let Some(filter) = options.where_clause.as_deref() {
        check_where_clause(filter)?;
    }
    logger.info(&format!(
        "Connecting to {}:{} (database `{}`)",
        config.host, config.port, database
    ));

    let mut adapter = MySqlAdapter::connect(config).await?;
    let target = DumpTarget {
        host: &config.host,
        database: &database,
    };
    let result = run_dump(&mut adapter, &target, options, out, logger).await;

    if let Err(e) = adapter.close().await {
        logger.error(&error_chain(&e));
    }

    result
}

/// Dumps `target.database` from `source` into `out`.
///
/// # Errors
/// - `Configuration` for a `WHERE` filter holding more than one statement,
///   before anything is queried or written
/// - `IncompatibleVersion` before anything is written
/// - `NoTables` when the effective table set is empty
/// - `TableDump` wrapping the failure of a per-table step
/// - `SchemaQuery`, `DataQuery` or `Io` from any other step
pub async fn run_dump<S, W>(
    source: &mut S,
    target: &DumpTarget<'_>,
    options: &DumpOptions,
    out: &mut W,
    logger: &dyn DumpLogger,
) -> Result<DumpSummary>
where
    S: DumpSource + ?Sized,
    W: Write + Send + ?Sized,
{
    if let Some(filter) = options.where_clause.as_deref() {
        check_where_clause(filter)?;
    }

    let server = source.server_info().await?;
    check_server_version(&server.version)?;
    logger.info(&format!("Connected to MySQL {}", server.version));

    statements::write_preamble(out, target.host, target.database, &server)
        .map_err(|e| DbDumpError::io("Failed to write dump preamble", e))?;

    let create_ddl = if options.create_database {
        Some(source.database_ddl(target.database).await?)
    } else {
        None
    };
    statements::write_database_header(out, target.database, create_ddl.as_deref())
        .map_err(|e| DbDumpError::io("Failed to write database header", e))?;

    let existing = source.list_tables().await?;
    let tables = resolve_tables(&options.tables, &existing, logger);
    if tables.is_empty() {
        return Err(DbDumpError::NoTables {
            database: target.database.to_string(),
        });
    }

    let mut summary = DumpSummary::default();
    for table in &tables {
        if options.skips_table(table) {
            logger.info(&format!("Skipping table `{}`", table));
            continue;
        }

        let rows = dump_table(source, out, table, options, logger)
            .await
            .map_err(|e| DbDumpError::in_table(table, e))?;
        if let Some(rows) = rows {
            summary.tables_with_data = summary.tables_with_data.saturating_add(1);
            summary.rows = summary.rows.saturating_add(rows);
        }
        summary.tables.push(table.clone());
    }

    if options.dump_triggers {
        let dumped: HashSet<&str> = summary.tables.iter().map(String::as_str).collect();
        for trigger in source.all_triggers_ddl(target.database).await? {
            if !dumped.contains(trigger.table.as_str()) {
                continue;
            }
            statements::write_trigger(out, &trigger).map_err(|e| {
                DbDumpError::io(format!("Failed to write trigger `{}`", trigger.name), e)
            })?;
            summary.triggers = summary.triggers.saturating_add(1);
        }
        logger.info(&format!("Dumped {} triggers", summary.triggers));
    }

    if options.dump_views {
        for view in source.all_view_ddl().await? {
            statements::write_view(out, &view).map_err(|e| {
                DbDumpError::io(format!("Failed to write view `{}`", view.name), e)
            })?;
            summary.views = summary.views.saturating_add(1);
        }
        logger.info(&format!("Dumped {} views", summary.views));
    }

    statements::write_trailer(out)
        .map_err(|e| DbDumpError::io("Failed to write dump trailer", e))?;
    out.flush()
        .map_err(|e| DbDumpError::io("Failed to flush dump output", e))?;

    logger.info(&format!(
        "Dump of `{}` complete: {} tables, {} rows",
        target.database,
        summary.tables.len(),
        summary.rows
    ));
    Ok(summary)
}

/// Writes structure and data of one table. Returns the row count when the
/// data section was written.
async fn dump_table<S, W>(
    source: &mut S,
    out: &mut W,
    table: &str,
    options: &DumpOptions,
    logger: &dyn DumpLogger,
) -> Result<Option<u64>>
where
    S: DumpSource + ?Sized,
    W: Write + Send + ?Sized,
{
    if options.exports_structure(table) {
        logger.info(&format!("Dumping structure of table `{}`", table));
        let ddl = source.table_ddl(table).await?;
        statements::write_table_structure(out, table, &ddl)
            .map_err(|e| DbDumpError::io("Failed to write table structure", e))?;
    }

    if !options.exports_data(table) {
        return Ok(None);
    }

    logger.info(&format!("Dumping data of table `{}`", table));
    let columns = non_generated_columns(&source.analyze_columns(table).await?);
    if columns.is_empty() {
        return Err(DbDumpError::NoInsertableColumns {
            table: table.to_string(),
        });
    }

    let rows = export_table_data(
        source,
        out,
        table,
        &columns,
        options.where_clause.as_deref(),
    )
    .await?;
    writeln!(out).map_err(|e| DbDumpError::io("Failed to write table data", e))?;
    Ok(Some(rows))
}

/// Works out which tables to dump and in what order.
///
/// With no explicit list every existing table is dumped in catalog order.
/// Otherwise the explicit order is kept; blank and repeated names are dropped,
/// and names that do not exist are dropped with an info log line.
pub fn resolve_tables(
    requested: &[String],
    existing: &[String],
    logger: &dyn DumpLogger,
) -> Vec<String> {
    let requested: Vec<&str> = requested
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    if requested.is_empty() {
        return existing.to_vec();
    }

    let known: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(requested.len());

    for name in requested {
        if !seen.insert(name) {
            continue;
        }
        if known.contains(name) {
            tables.push(name.to_string());
        } else {
            logger.info(&format!("Table `{}` not found in database, skipping", name));
        }
    }

    tables
}
