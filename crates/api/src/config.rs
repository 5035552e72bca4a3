//! Client configuration loaded from environment variables.

/// Configuration for the WhisprTales API client.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the WhisprTales REST API, without a trailing slash.
    pub api_url: String,
    /// Per-request HTTP timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// TTL of the cached geolocation result in seconds (default: `3600`).
    pub geo_cache_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
            geo_cache_ttl_secs: 3600,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `WHISPRTALES_API_URL`    | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `GEO_CACHE_TTL_SECS`     | `3600`                  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = std::env::var("WHISPRTALES_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.request_timeout_secs.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let geo_cache_ttl_secs: u64 = std::env::var("GEO_CACHE_TTL_SECS")
            .unwrap_or_else(|_| defaults.geo_cache_ttl_secs.to_string())
            .parse()
            .expect("GEO_CACHE_TTL_SECS must be a valid u64");

        Self {
            api_url,
            request_timeout_secs,
            geo_cache_ttl_secs,
        }
    }
}
