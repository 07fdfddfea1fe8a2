// Server configuration
// Decision: Everything comes from environment variables (optionally via .env)
// Decision: No DATABASE_URL means dev mode with in-memory storage

use axum::http::HeaderValue;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string; `None` selects the in-memory backend
    pub database_url: Option<String>,
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Prefix nested in front of the API routes, e.g. "/api"
    pub api_prefix: String,
    /// Origins allowed by the CORS layer; empty disables CORS
    pub cors_origins: Vec<HeaderValue>,
    /// Request body limit for spreadsheet uploads
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_upload_bytes = var("MAX_UPLOAD_BYTES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            database_url: var("DATABASE_URL"),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            api_prefix: normalize_prefix(&var("API_PREFIX").unwrap_or_default()),
            cors_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            max_upload_bytes,
        }
    }
}

/// Parse a comma-separated origin list, skipping entries that are not valid header values
pub fn parse_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// "api" and "/api/" both become "/api"; a bare "/" becomes empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
