//! Command-line interface for dbdump.
//!
//! The argument types live here so they can be unit tested; `main.rs` only
//! wires them to the core library.

use clap::{ArgAction, Args, Parser};
use dbdump_core::DumpOptions;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dbdump")]
#[command(about = "Logical backup tool for MySQL 8+ databases")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "
dbdump - plain-SQL backups of a MySQL 8+ database

Writes the dump to standard output and progress to standard error. The output
replays with the stock client:  dbdump > backup.sql && mysql < backup.sql

CONNECTION (environment, a .env file in the working directory is honoured):
  DB_HOST      server host            (default: localhost)
  DB_PORT      server port            (default: 3306)
  DB_USER      user name              (default: root)
  DB_PASSWORD  password               (default: empty)
  DB_NAME      database to dump       (required)

EXAMPLES:
  dbdump > shop.sql
  dbdump users,orders --where=\"created_at >= '2024-01-01'\"
  dbdump --ignore-table=logs --ignore-table-data=sessions --create-database=false
")]
pub struct Cli {
    /// Logging flags
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Comma-separated tables to dump, in order (default: every base table)
    #[arg(value_name = "TABLES")]
    pub tables: Option<String>,

    /// Emit `CREATE DATABASE` before `USE`
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub create_database: bool,

    /// Skip a table entirely (repeatable)
    #[arg(long = "ignore-table", value_name = "TABLE")]
    pub ignore_tables: Vec<String>,

    /// Dump a table's structure but not its rows (repeatable)
    #[arg(long, value_name = "TABLE")]
    pub ignore_table_data: Vec<String>,

    /// Dump a table's rows but not its structure (repeatable)
    #[arg(long, value_name = "TABLE")]
    pub ignore_table_structure: Vec<String>,

    /// Row filter appended to every data SELECT
    #[arg(long = "where", value_name = "PREDICATE")]
    pub where_clause: Option<String>,

    /// Also dump view definitions
    #[arg(long)]
    pub views: bool,

    /// Also dump triggers of the dumped tables
    #[arg(long)]
    pub triggers: bool,
}

/// Logging flags shared by every invocation.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Table names from the positional list, trimmed, blanks dropped.
    pub fn table_list(&self) -> Vec<String> {
        self.tables
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Builds the dump options described by the arguments.
    pub fn dump_options(&self) -> DumpOptions {
        let mut options = DumpOptions::default()
            .with_tables(self.table_list())
            .with_create_database(self.create_database)
            .with_views(self.views)
            .with_triggers(self.triggers);

        for table in &self.ignore_tables {
            options = options.ignore_table(table.trim());
        }
        for table in &self.ignore_table_data {
            options = options.ignore_table_data(table.trim());
        }
        for table in &self.ignore_table_structure {
            options = options.ignore_table_structure(table.trim());
        }
        if let Some(predicate) = &self.where_clause {
            options = options.with_where(predicate.as_str());
        }

        options
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dbdump").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        let options = cli.dump_options();

        assert!(options.tables.is_empty());
        assert!(options.create_database);
        assert!(options.ignore_tables.is_empty());
        assert!(options.where_clause.is_none());
        assert!(!options.dump_views);
        assert!(!options.dump_triggers);
        assert_eq!(cli.global.verbose, 0);
        assert!(!cli.global.quiet);
    }

    #[test]
    fn test_positional_table_list() {
        let cli = parse(&["users, orders,,items "]);
        assert_eq!(cli.table_list(), vec!["users", "orders", "items"]);
    }

    #[test]
    fn test_create_database_flag_forms() {
        assert!(!parse(&["--create-database=false"]).create_database);
        assert!(parse(&["--create-database=true"]).create_database);
        assert!(parse(&["--create-database"]).create_database);
    }

    #[test]
    fn test_repeatable_ignore_flags() {
        let options = parse(&[
            "--ignore-table=logs",
            "--ignore-table",
            "audit",
            "--ignore-table-data=sessions",
            "--ignore-table-structure=cache",
        ])
        .dump_options();

        assert!(options.skips_table("logs"));
        assert!(options.skips_table("audit"));
        assert!(options.exports_structure("sessions"));
        assert!(!options.exports_data("sessions"));
        assert!(!options.exports_structure("cache"));
        assert!(options.exports_data("cache"));
    }

    #[test]
    fn test_where_clause() {
        let options = parse(&["--where=id > 10 AND status = 'active'"]).dump_options();
        assert_eq!(
            options.where_clause.as_deref(),
            Some("id > 10 AND status = 'active'")
        );

        let options = parse(&["--where="]).dump_options();
        assert!(options.where_clause.is_none());
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["-vv"]).global.verbose, 2);
        assert!(parse(&["--quiet"]).global.quiet);
    }

    #[test]
    fn test_views_and_triggers() {
        let options = parse(&["--views", "--triggers"]).dump_options();
        assert!(options.dump_views);
        assert!(options.dump_triggers);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["dbdump", "--no-such-flag"]).is_err());
    }
}
