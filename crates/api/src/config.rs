use std::env;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} must be set when {because} is set")]
    Missing { var: &'static str, because: &'static str },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection URL. Without one the server keeps everything
    /// in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// JWT signing secret. Random for each process unless configured, so
    /// tokens never outlive a restart by accident.
    pub jwt_secret: String,
    /// Argon2 PHC hash of the admin password. Login is disabled when unset.
    pub admin_password_hash: Option<String>,
    pub token_ttl_minutes: i64,
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
            database_url: None,
            db_max_connections: 20,
            db_min_connections: 5,
            jwt_secret: random_secret(),
            admin_password_hash: None,
            token_ttl_minutes: 480,
            event_bus_capacity: 1024,
            log_level: "info".to_string(),
        }
    }
}

fn random_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let admin_password_hash = non_empty("ADMIN_PASSWORD_HASH");
        let jwt_secret = match non_empty("JWT_SECRET") {
            Some(secret) => secret,
            None if admin_password_hash.is_some() => {
                return Err(ConfigError::Missing {
                    var: "JWT_SECRET",
                    because: "ADMIN_PASSWORD_HASH",
                })
            }
            None => defaults.jwt_secret,
        };
        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.db_min_connections)?,
            jwt_secret,
            admin_password_hash,
            token_ttl_minutes: parse_or(&lookup, "TOKEN_TTL_MINUTES", defaults.token_ttl_minutes)?,
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity)?,
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
