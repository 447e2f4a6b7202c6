//! Per-run dump switches.

use std::collections::HashSet;

/// What to emit for one run.
///
/// The ignore lists are plain sets: the orchestrator only tests membership.
///
/// # Example
/// ```rust
/// use dbdump_core::adapters::DumpOptions;
///
/// let options = DumpOptions::default()
///     .ignore_table("logs")
///     .ignore_table_data("sessions")
///     .with_where("id > 100");
///
/// assert!(options.skips_table("logs"));
/// assert!(options.exports_structure("sessions"));
/// assert!(!options.exports_data("sessions"));
/// ```
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Explicit tables to dump; empty means every base table
    pub tables: Vec<String>,
    /// Emit `CREATE DATABASE` before `USE`
    pub create_database: bool,
    /// Tables skipped entirely (structure and data)
    pub ignore_tables: HashSet<String>,
    /// Tables whose data is skipped
    pub ignore_table_data: HashSet<String>,
    /// Tables whose structure is skipped
    pub ignore_table_structure: HashSet<String>,
    /// Predicate applied to every exported table's data
    pub where_clause: Option<String>,
    /// Emit view definitions after the tables
    pub dump_views: bool,
    /// Emit trigger definitions after the tables
    pub dump_triggers: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            create_database: true,
            ignore_tables: HashSet::new(),
            ignore_table_data: HashSet::new(),
            ignore_table_structure: HashSet::new(),
            where_clause: None,
            dump_views: false,
            dump_triggers: false,
        }
    }
}

impl DumpOptions {
    /// Restricts the dump to the given tables.
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the `CREATE DATABASE` statement.
    pub const fn with_create_database(mut self, create_database: bool) -> Self {
        self.create_database = create_database;
        self
    }

    /// Skips a table's structure and data.
    pub fn ignore_table(mut self, table: impl Into<String>) -> Self {
        self.ignore_tables.insert(table.into());
        self
    }

    /// Skips a table's data only.
    pub fn ignore_table_data(mut self, table: impl Into<String>) -> Self {
        self.ignore_table_data.insert(table.into());
        self
    }

    /// Skips a table's structure only.
    pub fn ignore_table_structure(mut self, table: impl Into<String>) -> Self {
        self.ignore_table_structure.insert(table.into());
        self
    }

    /// Sets the row filter; a blank predicate clears it.
    pub fn with_where(mut self, predicate: impl Into<String>) -> Self {
        let predicate = predicate.into();
        self.where_clause = if predicate.trim().is_empty() {
            None
        } else {
            Some(predicate)
        };
        self
    }

    /// Enables view definitions in the output.
    pub const fn with_views(mut self, dump_views: bool) -> Self {
        self.dump_views = dump_views;
        self
    }

    /// Enables trigger definitions in the output.
    pub const fn with_triggers(mut self, dump_triggers: bool) -> Self {
        self.dump_triggers = dump_triggers;
        self
    }

    /// True when the table is skipped entirely.
    pub fn skips_table(&self, table: &str) -> bool {
        self.ignore_tables.contains(table)
    }

    /// True when the table's `CREATE TABLE` block should be written.
    pub fn exports_structure(&self, table: &str) -> bool {
        !self.skips_table(table) && !self.ignore_table_structure.contains(table)
    }

    /// True when the table's rows should be written.
    pub fn exports_data(&self, table: &str) -> bool {
        !self.skips_table(table) && !self.ignore_table_data.contains(table)
    }
}
