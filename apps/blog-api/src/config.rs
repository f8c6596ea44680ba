//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_core::pagination::PageNumberPagination;
use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub pagination: PageNumberPagination,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let defaults = PageNumberPagination::default();
        let pagination = PageNumberPagination {
            page_size: parse_var("POSTS_PAGE_SIZE")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.page_size),
            max_page_size: parse_var("POSTS_MAX_PAGE_SIZE").filter(|&n| n > 0),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            pagination,
        }
    }
}

// Unset and unparsable values both read as absent.
fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
