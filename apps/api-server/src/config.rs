//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Posts per page on the front listing.
    pub page_size: u64,
    /// Where a client is sent after deleting its own account.
    pub landing_path: String,
    pub session_ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            page_size: 5,
            landing_path: "/".to_string(),
            session_ttl_hours: 24,
        }
    }
}

fn parsed<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
            connect_timeout: Duration::from_secs(parsed("DB_CONNECT_TIMEOUT_SECS", 10)),
        });

        let page_size = parsed("PAGE_SIZE", defaults.page_size);
        if page_size == 0 {
            tracing::warn!("PAGE_SIZE=0 is not usable, falling back to 1");
        }

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port),
            database,
            page_size: page_size.max(1),
            landing_path: env::var("LANDING_PATH").unwrap_or(defaults.landing_path),
            session_ttl_hours: parsed("SESSION_TTL_HOURS", defaults.session_ttl_hours),
        }
    }
}
