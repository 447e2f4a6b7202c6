//! Configuration types for a dump run.
//!
//! - `connection`: `ConnectionConfig`, loaded from `DB_*` environment variables
//! - `dump`: `DumpOptions`, the per-run switches coming from the command line

mod connection;
mod dump;

pub use connection::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USER};
pub use dump::DumpOptions;
