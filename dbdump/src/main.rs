//! Logical backup tool for MySQL 8+.
//!
//! Reads connection settings from the environment (and `.env`), dumps the
//! configured database to standard output and logs progress to standard
//! error. Exit status is 0 on success and 1 on any failure.

use std::io::{BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use dbdump::Cli;
use dbdump_core::{
    ConnectionConfig, DumpLogger, TracingLogger, dump_database, error_chain, init_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env file is normal; the environment alone is enough.
    let dotenv = dotenvy::dotenv();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let logger = TracingLogger;
    let config = ConnectionConfig::from_env();
    let options = cli.dump_options();

    let mut out = BufWriter::new(std::io::stdout());
    let result = dump_database(&config, &options, &mut out, &logger).await;
    // Keep whatever was written before a failure.
    let flushed = out.flush();

    match result {
        Ok(summary) => {
            tracing::debug!(
                "{} of {} tables carried data",
                summary.tables_with_data,
                summary.tables.len()
            );
            if let Err(e) = flushed {
                logger.error(&format!("Failed to flush dump output: {}", e));
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.error(&format!("Dump failed: {}", error_chain(&e)));
            ExitCode::FAILURE
        }
    }
}
