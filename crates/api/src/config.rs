use std::str::FromStr;
use std::time::Duration;

use placement_core::filter::ParseMode;
use placement_core::pagination::{PageBounds, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Which [`PlacementStore`](placement_db::PlacementStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for the store queries of one request, in milliseconds
    /// (default: `10000`). Must be shorter than the request timeout so a slow
    /// store fails as a store error rather than an HTTP timeout.
    pub store_timeout_ms: u64,
    /// Upper bound on store teardown during shutdown, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Page size when `limit` is missing or invalid (default: `20`).
    pub default_page_limit: i64,
    /// Largest accepted page size (default: `500`).
    pub max_page_limit: i64,
    /// Reject malformed numeric query values with 400 instead of ignoring them.
    pub strict_query_params: bool,
    /// Record store backend (default: `postgres`).
    pub store_backend: StoreBackend,
    /// Postgres connection string; required for the `postgres` backend.
    pub database_url: Option<String>,
    /// Connection pool size (default: `20`).
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORE_TIMEOUT_MS`     | `10000`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `DEFAULT_PAGE_LIMIT`   | `20`                       |
    /// | `MAX_PAGE_LIMIT`       | `500`                      |
    /// | `STRICT_QUERY_PARAMS`  | `false`                    |
    /// | `STORE_BACKEND`        | `postgres`                 |
    /// | `DATABASE_URL`         | (none)                     |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let default_page_limit: i64 = env_or("DEFAULT_PAGE_LIMIT", DEFAULT_PAGE_LIMIT);
        let max_page_limit: i64 = env_or("MAX_PAGE_LIMIT", MAX_PAGE_LIMIT);
        assert!(
            default_page_limit >= 1 && max_page_limit >= default_page_limit,
            "DEFAULT_PAGE_LIMIT must be >= 1 and <= MAX_PAGE_LIMIT"
        );

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);
        let store_timeout_ms: u64 = env_or("STORE_TIMEOUT_MS", 10_000);
        assert!(
            store_timeout_ms >= 1 && store_timeout_ms < request_timeout_secs.saturating_mul(1000),
            "STORE_TIMEOUT_MS must be >= 1 and below REQUEST_TIMEOUT_SECS"
        );

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs,
            store_timeout_ms,
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            default_page_limit,
            max_page_limit,
            strict_query_params: env_or("STRICT_QUERY_PARAMS", false),
            store_backend: env_or("STORE_BACKEND", StoreBackend::Postgres),
            database_url: std::env::var("DATABASE_URL").ok(),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn page_bounds(&self) -> PageBounds {
        PageBounds {
            default_limit: self.default_page_limit,
            max_limit: self.max_page_limit,
        }
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_query_params {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
