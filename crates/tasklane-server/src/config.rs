//! Server configuration.

use crate::db::DEFAULT_ITEMS_PER_PAGE;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_addr: String,

    /// Page size for paginated listings.
    pub items_per_page: u64,

    /// Locale for user-facing messages.
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8080".to_string(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            locale: "en".to_string(),
        }
    }
}
