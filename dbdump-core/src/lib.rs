//! Core library for dbdump, a logical backup tool for MySQL 8+.
//!
//! The crate reads a database's catalog and rows over a single connection and
//! writes a plain-SQL dump (DDL followed by one `INSERT` per row) that the
//! stock `mysql` client can replay.
//!
//! # Guarantees
//! - Only `SELECT` and `SHOW` statements are sent to the server
//! - Rows are streamed; a table is never held in memory
//! - Logs go to stderr, the dump to the caller's writer
//! - The password is zeroized on drop and never logged or formatted
//!
//! # Architecture
//! - [`adapters`]: connection config, dump options and the MySQL adapter
//! - [`dump`]: orchestration, statement blocks and `INSERT` rendering
//! - [`format`]: SQL literal and identifier formatting

pub mod adapters;
pub mod dump;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use adapters::{ConnectionConfig, DumpOptions, DumpSource, RowSink, RowSource, SchemaInspector};
pub use dump::{DumpSummary, DumpTarget, dump_database, run_dump};
pub use error::{DbDumpError, Result, error_chain};
pub use format::{SqlValue, format_value};
pub use logging::{DumpLogger, TracingLogger, init_logging};
pub use models::{Column, ServerInfo, TriggerInfo, ViewInfo};
