//! Country lookup racing redundant geolocation providers.
//!
//! Several free geolocation services exist with spotty availability, so
//! [`GeoLocator`] queries all configured providers concurrently and
//! takes whichever resolves first. If every provider fails, the lookup
//! falls back to [`DEFAULT_COUNTRY`]. Successful results are cached
//! with a TTL; call [`GeoLocator::invalidate`] to force a fresh lookup.

use std::time::Duration;

use futures::future::select_ok;
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::api::ApiError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Country code returned when every provider fails.
pub const DEFAULT_COUNTRY: &str = "US";

/// Default provider endpoints. Each returns a JSON object carrying the
/// caller's ISO 3166-1 alpha-2 country code under a provider-specific
/// field name.
pub const DEFAULT_PROVIDERS: &[&str] = &[
    "https://ipapi.co/json/",
    "https://ip-api.com/json/",
    "https://ipinfo.io/json",
];

// ---------------------------------------------------------------------------
// Cache entry
// ---------------------------------------------------------------------------

/// Cached lookup result with its fetch time.
struct CachedCountry {
    country: String,
    fetched_at: Instant,
}

impl CachedCountry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

// ---------------------------------------------------------------------------
// GeoLocator
// ---------------------------------------------------------------------------

/// Redundant-provider country lookup with a TTL cache.
///
/// Constructed explicitly with its providers and TTL -- there is no
/// module-level cache or import-time side effect.
pub struct GeoLocator {
    client: reqwest::Client,
    providers: Vec<String>,
    ttl: Duration,
    cache: Mutex<Option<CachedCountry>>,
}

impl GeoLocator {
    /// Create a locator with the default provider list.
    pub fn new(ttl: Duration) -> Self {
        Self::with_providers(
            DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect(),
            ttl,
        )
    }

    /// Create a locator with a custom provider list.
    pub fn with_providers(providers: Vec<String>, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// The caller's country code.
    ///
    /// Returns the cached value while it is fresh. Otherwise races all
    /// providers and caches the first successful answer; if all
    /// providers fail, returns [`DEFAULT_COUNTRY`] without caching it,
    /// so the next call retries.
    pub async fn country(&self) -> String {
        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.as_ref() {
                if !entry.is_expired(self.ttl) {
                    return entry.country.clone();
                }
            }
        }

        match self.race_providers().await {
            Some(country) => {
                let mut cache = self.cache.lock().await;
                *cache = Some(CachedCountry {
                    country: country.clone(),
                    fetched_at: Instant::now(),
                });
                country
            }
            None => {
                tracing::warn!(
                    fallback = DEFAULT_COUNTRY,
                    "All geolocation providers failed",
                );
                DEFAULT_COUNTRY.to_string()
            }
        }
    }

    /// Drop the cached result so the next [`country`](Self::country)
    /// call queries the providers again.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
    }

    // ---- private helpers ----

    /// Query all providers concurrently and return the first success.
    async fn race_providers(&self) -> Option<String> {
        if self.providers.is_empty() {
            return None;
        }

        let lookups: Vec<_> = self
            .providers
            .iter()
            .map(|url| fetch_country(&self.client, url).boxed())
            .collect();

        match select_ok(lookups).await {
            Ok((country, _remaining)) => {
                tracing::debug!(country = %country, "Geolocation resolved");
                Some(country)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Last geolocation provider failed");
                None
            }
        }
    }
}

/// Fetch one provider and extract the country code from its payload.
async fn fetch_country(client: &reqwest::Client, url: &str) -> Result<String, ApiError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: format!("Geolocation provider returned {status}"),
        });
    }

    let payload: serde_json::Value = response.json().await?;
    extract_country(&payload).ok_or_else(|| ApiError::Api {
        status: status.as_u16(),
        message: "Geolocation response contained no country code".to_string(),
    })
}

/// Pull a two-letter country code out of a provider payload.
///
/// Providers disagree on the field name, so the known spellings are
/// probed in order.
fn extract_country(payload: &serde_json::Value) -> Option<String> {
    for field in ["country_code", "countryCode", "country"] {
        if let Some(value) = payload.get(field).and_then(|v| v.as_str()) {
            if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Some(value.to_ascii_uppercase());
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_snake_case_field() {
        let payload = serde_json::json!({"country_code": "IN"});
        assert_eq!(extract_country(&payload).as_deref(), Some("IN"));
    }

    #[test]
    fn extract_camel_case_field() {
        let payload = serde_json::json!({"countryCode": "de"});
        assert_eq!(extract_country(&payload).as_deref(), Some("DE"));
    }

    #[test]
    fn extract_plain_country_field() {
        let payload = serde_json::json!({"country": "US", "city": "Portland"});
        assert_eq!(extract_country(&payload).as_deref(), Some("US"));
    }

    #[test]
    fn country_name_is_not_a_code() {
        // Some providers put the full name in `country`.
        let payload = serde_json::json!({"country": "India"});
        assert_eq!(extract_country(&payload), None);
    }

    #[test]
    fn missing_fields_yield_none() {
        let payload = serde_json::json!({"ip": "203.0.113.9"});
        assert_eq!(extract_country(&payload), None);
    }

    #[test]
    fn field_order_prefers_explicit_code() {
        let payload = serde_json::json!({"country": "XX", "country_code": "IN"});
        assert_eq!(extract_country(&payload).as_deref(), Some("IN"));
    }
}
