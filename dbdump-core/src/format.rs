//! SQL literal formatting for exported row values.
//!
//! A scanned value becomes text that can be pasted into an `INSERT` statement
//! and replayed by the `mysql` client unchanged.

use std::fmt::Write as _;

/// A single column value as scanned from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL `NULL`
    Null,
    /// Any integer column
    Integer(i64),
    /// `FLOAT` / `DOUBLE`
    Float(f64),
    /// Everything else, as text
    Text(String),
    /// Raw bytes that are not valid UTF-8
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Wraps raw bytes, preferring `Text` when they are valid UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

/// Formats a value as an SQL literal.
///
/// - `Null` → `NULL` (unquoted)
/// - `Integer` → decimal digits in single quotes
/// - `Float` → two decimal places in single quotes
/// - `Text` → single-quoted and escaped, see [`escape_string`]
/// - `Bytes` → hexadecimal literal `X'..'`
pub fn format_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Integer(n) => format!("'{}'", n),
        SqlValue::Float(f) => format!("'{:.2}'", f),
        SqlValue::Text(s) => format!("'{}'", escape_string(s)),
        SqlValue::Bytes(b) => hex_literal(b),
    }
}

/// Escapes text for use inside a single-quoted MySQL string literal.
///
/// Single quotes are doubled; backslash, newline, carriage return, tab, NUL
/// and 0x1A become their backslash escape sequences.
pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' => escaped.push_str("''"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            '\x1a' => escaped.push_str("\\Z"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn hex_literal(bytes: &[u8]) -> String {
    let mut literal = String::with_capacity(bytes.len().saturating_mul(2).saturating_add(3));
    literal.push_str("X'");
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(literal, "{:02X}", byte);
    }
    literal.push('\'');
    literal
}

/// Quotes an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
