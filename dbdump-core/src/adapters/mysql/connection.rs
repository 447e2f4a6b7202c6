//! MySQL connection management.
//!
//! The dump runs over exactly one connection: it is opened and pinged up
//! front, shared by every catalog and data query, and closed once at the end.

use super::MySqlAdapter;
use crate::adapters::ConnectionConfig;
use crate::error::DbDumpError;
use crate::models::ServerInfo;
use crate::Result;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection, MySqlConnection};

/// Session character set requested at connect time.
pub const CONNECTION_CHARSET: &str = "utf8mb4";

/// Builds `sqlx` connect options from the run configuration.
///
/// Statement logging is disabled: the data `SELECT` may carry a user-supplied
/// `WHERE` predicate and has no place in the log at INFO level.
pub fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database)
        .charset(CONNECTION_CHARSET);

    if !config.password.is_empty() {
        options = options.password(config.password.as_str());
    }

    options.disable_statement_logging()
}

impl MySqlAdapter {
    /// Opens the connection and verifies it with a ping.
    ///
    /// # Errors
    /// Returns `DbDumpError::Configuration` if no database is configured and
    /// `DbDumpError::Connection` if the server cannot be reached or rejects
    /// the credentials.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let database = config.require_database()?.to_string();
        let endpoint = format!("{}:{}", config.host, config.port);

        tracing::debug!(
            "Opening MySQL connection to {} as {} (database `{}`)",
            endpoint,
            config.user,
            database
        );

        let mut conn = MySqlConnection::connect_with(&connect_options(config))
            .await
            .map_err(|e| {
                DbDumpError::connection_failed(format!("Failed to connect to {}", endpoint), e)
            })?;

        if let Err(e) = conn.ping().await {
            // Best effort; the ping failure is the error worth reporting.
            let _ = conn.close().await;
            return Err(DbDumpError::connection_failed(
                format!("Failed to ping {}", endpoint),
                e,
            ));
        }

        tracing::debug!("Connection to {} verified", endpoint);
        Ok(Self { conn, database })
    }

    /// Closes the connection, sending `COM_QUIT` to the server.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| DbDumpError::connection_failed("Failed to close connection", e))
    }
}

/// Reads the server version, character set and session UTC offset.
pub(crate) async fn fetch_server_info(conn: &mut MySqlConnection) -> Result<ServerInfo> {
    let version: String = sqlx::query_scalar("SELECT CAST(VERSION() AS CHAR)")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbDumpError::schema_query_failed("Failed to read server version", e))?;

    let charset: String = sqlx::query_scalar("SELECT CAST(@@character_set_server AS CHAR)")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbDumpError::schema_query_failed("Failed to read server charset", e))?;

    let offset: String = sqlx::query_scalar(
        "SELECT CAST(TIME_FORMAT(TIMEDIFF(NOW(), UTC_TIMESTAMP()), '%H:%i') AS CHAR)",
    )
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| DbDumpError::schema_query_failed("Failed to read session time zone", e))?;

    tracing::debug!("Server version {} (charset {})", version, charset);

    Ok(ServerInfo {
        version,
        charset,
        timezone: ServerInfo::signed_offset(&offset),
    })
}
