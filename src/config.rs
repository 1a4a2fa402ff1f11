//! Service configuration, loaded from the environment.
//!
//! Environment variables:
//! - `DATABASE_URL`: store connection string (required)
//! - `JWT_SECRET`: HS256 secret shared with the token issuer (required)
//! - `BIND_ADDR`: listen address (default: `0.0.0.0:3000`)
//! - `DB_MAX_CONNECTIONS`: pool size (default: 10)
//! - `RUN_MIGRATIONS`: apply pending migrations at startup (default: true)
//! - `RUST_LOG`: log filter (default: `info`)

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value,
            })?,
            None => 10,
        };

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|s| s.trim().to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            run_migrations,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
