//! Server compatibility checks.

use crate::{Result, error::DbDumpError};

/// Oldest MySQL major release the dump format targets.
pub const MINIMUM_MAJOR_VERSION: u32 = 8;

/// Rejects servers older than [`MINIMUM_MAJOR_VERSION`].
///
/// Only the leading major component (digits before the first `.`) is
/// inspected. A version string that does not start with a number is treated
/// as compatible.
///
/// # Example
/// ```rust
/// use dbdump_core::validation::check_server_version;
///
/// assert!(check_server_version("8.0.31").is_ok());
/// assert!(check_server_version("5.7.40").is_err());
/// ```
pub fn check_server_version(version: &str) -> Result<()> {
    match major_version(version) {
        Some(major) if major < MINIMUM_MAJOR_VERSION => Err(DbDumpError::IncompatibleVersion {
            version: version.to_string(),
            minimum: MINIMUM_MAJOR_VERSION,
        }),
        _ => Ok(()),
    }
}

fn major_version(version: &str) -> Option<u32> {
    let (major, _) = version.trim().split_once('.')?;
    major.parse().ok()
}

/// Rejects a row filter that would end the data `SELECT` early.
///
/// The filter is sent as part of a text-protocol query, so a `;` outside a
/// quoted literal or identifier would start a second statement. The scan runs
/// once with backslash escapes and once without, since `NO_BACKSLASH_ESCAPES`
/// changes where a string literal ends.
///
/// # Example
/// ```rust
/// use dbdump_core::validation::check_where_clause;
///
/// assert!(check_where_clause("note = 'a;b'").is_ok());
/// assert!(check_where_clause("1=1; DELETE FROM users").is_err());
/// ```
pub fn check_where_clause(filter: &str) -> Result<()> {
    if has_statement_separator(filter, true) || has_statement_separator(filter, false) {
        return Err(DbDumpError::configuration(
            "WHERE filter must be a single predicate; `;` is only allowed inside quotes",
        ));
    }
    Ok(())
}

fn has_statement_separator(filter: &str, backslash_escapes: bool) -> bool {
    let mut quote: Option<char> = None;
    let mut chars = filter.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(open) if c == open => quote = None,
            Some('`') => {}
            Some(_) if c == '\\' && backslash_escapes => {
                chars.next();
            }
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == ';' => return true,
            None => {}
        }
    }

    false
}
