//! Error types for dump operations.
//!
//! Every failure is terminal for a run: nothing here is retried. Variants carry
//! enough context to tell *which* step failed, and none of them ever embeds the
//! database password.

use thiserror::Error;

/// Main error type for dbdump operations.
#[derive(Debug, Error)]
pub enum DbDumpError {
    /// Missing or invalid configuration (e.g. `DB_NAME` unset)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Opening or pinging the database connection failed
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server version is older than the minimum supported release
    #[error("Incompatible MySQL version: {version}. Required version >= {minimum}.0")]
    IncompatibleVersion { version: String, minimum: u32 },

    /// Catalog/metadata query or scan failed
    #[error("Schema query failed: {context}")]
    SchemaQuery {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Row fetch or scan failed while exporting table data
    #[error("Data query failed: {context}")]
    DataQuery {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The effective table set resolved to nothing
    #[error("No tables found in database: {database}")]
    NoTables { database: String },

    /// Every column of the table is generated, so no INSERT can be produced
    #[error("No non-generated columns found in table `{table}`")]
    NoInsertableColumns { table: String },

    /// A per-table step failed; `source` names the underlying failure
    #[error("Error dumping table `{table}`")]
    TableDump {
        table: String,
        #[source]
        source: Box<DbDumpError>,
    },

    /// Writing the dump stream failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with `DbDumpError`
pub type Result<T> = std::result::Result<T, DbDumpError>;

impl DbDumpError {
    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a schema query error with context
    pub fn schema_query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SchemaQuery {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a data query error with context
    pub fn data_query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DataQuery {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a parsing error for a field of a catalog result row.
    ///
    /// # Arguments
    /// * `field_name` - Name or position of the field being parsed
    /// * `object_context` - Optional table/view/trigger for better error messages
    /// * `error` - The underlying decoding error
    pub fn parse_field<E>(field_name: &str, object_context: Option<&str>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let context = match object_context {
            Some(object) => format!(
                "Failed to parse field '{}' from result for '{}'",
                field_name, object
            ),
            None => format!("Failed to parse field '{}' from catalog result", field_name),
        };
        Self::SchemaQuery {
            context,
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an output error
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wraps an error raised while dumping `table`.
    pub fn in_table(table: impl Into<String>, error: DbDumpError) -> Self {
        Self::TableDump {
            table: table.into(),
            source: Box::new(error),
        }
    }

    /// The innermost `DbDumpError`, looking through `TableDump` wrappers.
    pub fn root(&self) -> &DbDumpError {
        match self {
            Self::TableDump { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Renders an error and all of its sources on one line, `outer: inner: ...`.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        rendered.push_str(": ");
        rendered.push_str(&source.to_string());
        current = source.source();
    }
    rendered
}
