//! Database connection configuration loaded from the environment.

use crate::{Result, error::DbDumpError};
use zeroize::Zeroizing;

/// Default MySQL host when `DB_HOST` is unset.
pub const DEFAULT_HOST: &str = "localhost";
/// Default MySQL port when `DB_PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3306;
/// Default user when `DB_USER` is unset.
pub const DEFAULT_USER: &str = "root";

/// Connection settings for one dump run.
///
/// Loaded once from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and
/// `DB_NAME`, then never mutated.
///
/// # Security
/// The password is kept in a `Zeroizing` container and is never printed by
/// the `Debug` implementation.
///
/// # Example
/// ```rust
/// use dbdump_core::adapters::ConnectionConfig;
///
/// let config = ConnectionConfig::new("db.internal", 3307, "backup", "secret", "shop");
/// assert_eq!(config.port, 3307);
/// assert!(!format!("{:?}", config).contains("secret"));
/// ```
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Database host address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password (zeroed on drop)
    pub password: Zeroizing<String>,
    /// Schema to dump; empty means "not configured"
    pub database: String,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            // password is intentionally omitted
            .finish_non_exhaustive()
    }
}

impl ConnectionConfig {
    /// Creates a configuration from explicit values.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: Zeroizing::new(password.into()),
            database: database.into(),
        }
    }

    /// Loads the configuration from process environment variables.
    ///
    /// Empty variables count as unset. `DB_PORT` falls back to 3306 when it
    /// does not parse as a non-zero port. `DB_NAME` has no default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = var("DB_PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|port| *port > 0)
            .unwrap_or(DEFAULT_PORT);

        Self {
            host: var("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            user: var("DB_USER").unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: Zeroizing::new(var("DB_PASSWORD").unwrap_or_default()),
            database: var("DB_NAME").unwrap_or_default(),
        }
    }

    /// Returns the configured database name or a configuration error.
    pub fn require_database(&self) -> Result<&str> {
        if self.database.trim().is_empty() {
            return Err(DbDumpError::configuration(
                "DB_NAME environment variable is required",
            ));
        }
        Ok(&self.database)
    }
}
