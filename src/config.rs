// src/config.rs

//! Runtime configuration loaded from the process environment.
//!
//! All connection parameters come from environment variables (optionally
//! seeded from a `.env` file before startup). Required variables fail
//! fast with an error naming every missing variable, before any network
//! call is attempted.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

/// Public base URL of the Avalon instance; prefix of every sitemap entry.
pub const PUBLIC_URL_ENV: &str = "AVALON_PUBLIC_URL";

/// Admin REST API base URL (REST backend).
pub const API_URL_ENV: &str = "AVALON_API_URL";

/// Static API key sent as the `Avalon-Api-Key` header (REST backend).
pub const API_TOKEN_ENV: &str = "AVALON_API_TOKEN";

/// Solr base URL; when present, selects the search-index backend.
pub const SOLR_URL_ENV: &str = "AVALON_SOLR_URL";

/// Listen address for the HTTP server.
pub const BIND_ENV: &str = "SITEMAP_BIND";

/// Per-request timeout in seconds for backend calls.
pub const TIMEOUT_ENV: &str = "SITEMAP_TIMEOUT_SECS";

/// Number of attempts per backend request (transient failures only).
pub const RETRY_ATTEMPTS_ENV: &str = "SITEMAP_RETRY_ATTEMPTS";

/// Delay between retry attempts in milliseconds.
pub const RETRY_DELAY_ENV: &str = "SITEMAP_RETRY_DELAY_MS";

const DEFAULT_BIND: &str = "0.0.0.0:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

const USER_AGENT: &str = concat!("avalon-sitemap/", env!("CARGO_PKG_VERSION"));

/// Which catalog backend the sitemap is built from.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Admin REST API with a static API key.
    Rest { api_url: Url, token: String },

    /// Solr search index.
    Solr { solr_url: Url },
}

impl BackendConfig {
    /// Short backend name for logging and `validate` output.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Rest { .. } => "rest",
            BackendConfig::Solr { .. } => "solr",
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User-Agent header for backend requests
    pub user_agent: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Attempts per request; retries apply to transient failures only
    pub retry_attempts: u32,

    /// Delay between attempts
    pub retry_delay: Duration,
}

/// Root application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL used to derive every emitted entry
    pub public_url: Url,

    /// Selected catalog backend
    pub backend: BackendConfig,

    /// HTTP server listen address
    pub bind: SocketAddr,

    /// Backend HTTP client settings
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// `lookup` returns the raw value for a variable name, or `None` if
    /// unset. Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let public_url = get(PUBLIC_URL_ENV);
        let solr_url = get(SOLR_URL_ENV);
        let api_url = get(API_URL_ENV);
        let api_token = get(API_TOKEN_ENV);

        // Collect every missing required variable so operators see the
        // full list at once. Solr presence switches the requirement set.
        let mut missing = Vec::new();
        if public_url.is_none() {
            missing.push(PUBLIC_URL_ENV);
        }
        if solr_url.is_none() {
            if api_url.is_none() {
                missing.push(API_URL_ENV);
            }
            if api_token.is_none() {
                missing.push(API_TOKEN_ENV);
            }
        }
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let public_url = parse_base_url(PUBLIC_URL_ENV, &public_url.unwrap())?;

        let backend = match solr_url {
            Some(raw) => BackendConfig::Solr {
                solr_url: parse_base_url(SOLR_URL_ENV, &raw)?,
            },
            None => BackendConfig::Rest {
                api_url: parse_base_url(API_URL_ENV, &api_url.unwrap())?,
                token: api_token.unwrap(),
            },
        };

        let bind = match get(BIND_ENV) {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                AppError::config(format!("{BIND_ENV} is not a valid listen address: {e}"))
            })?,
            None => DEFAULT_BIND.parse().unwrap(),
        };

        let timeout_secs = parse_positive(&get, TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS)?;
        let retry_attempts = parse_positive(&get, RETRY_ATTEMPTS_ENV, DEFAULT_RETRY_ATTEMPTS)?;
        let retry_delay_ms = match get(RETRY_DELAY_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::config(format!("{RETRY_DELAY_ENV} must be a number: {e}")))?,
            None => DEFAULT_RETRY_DELAY_MS,
        };

        Ok(Self {
            public_url,
            backend,
            bind,
            http: HttpConfig {
                user_agent: USER_AGENT.to_string(),
                timeout: Duration::from_secs(timeout_secs),
                retry_attempts,
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
        })
    }
}

/// Parse a base URL variable, requiring an absolute http(s) URL.
fn parse_base_url(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::config(format!("{name} is not a valid URL ({raw}): {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::config(format!(
            "{name} must use http or https, got scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(AppError::config(format!("{name} has no host: {raw}")));
    }
    Ok(url)
}

/// Parse an optional numeric variable that must be strictly positive.
fn parse_positive<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
    T::Err: std::fmt::Display,
{
    match get(name) {
        Some(raw) => {
            let value = raw
                .parse::<T>()
                .map_err(|e| AppError::config(format!("{name} must be a number: {e}")))?;
            if value < T::from(1u8) {
                return Err(AppError::config(format!("{name} must be > 0")));
            }
            Ok(value)
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn rest_backend_from_full_environment() {
        let config = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "https://av.example.edu"),
            (API_URL_ENV, "https://av.example.edu/api"),
            (API_TOKEN_ENV, "sekrit"),
        ]))
        .unwrap();

        assert_eq!(config.backend.kind(), "rest");
        assert_eq!(config.public_url.as_str(), "https://av.example.edu/");
        assert_eq!(config.bind, DEFAULT_BIND.parse().unwrap());
        assert_eq!(config.http.timeout, Duration::from_secs(30));
    }

    #[test]
    fn solr_backend_selected_when_solr_url_present() {
        let config = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "https://av.example.edu"),
            (SOLR_URL_ENV, "http://solr.internal:8983"),
            // REST variables are ignored when Solr is configured
            (API_URL_ENV, "https://av.example.edu/api"),
        ]))
        .unwrap();

        assert_eq!(config.backend.kind(), "solr");
    }

    #[test]
    fn missing_public_url_fails() {
        let err = Config::from_lookup(lookup(&[
            (API_URL_ENV, "https://av.example.edu/api"),
            (API_TOKEN_ENV, "sekrit"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains(PUBLIC_URL_ENV));
    }

    #[test]
    fn missing_rest_variables_are_all_reported() {
        let err =
            Config::from_lookup(lookup(&[(PUBLIC_URL_ENV, "https://av.example.edu")])).unwrap_err();

        let message = err.to_string();
        assert!(message.contains(API_URL_ENV));
        assert!(message.contains(API_TOKEN_ENV));
    }

    #[test]
    fn blank_value_counts_as_unset() {
        let err = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "   "),
            (API_URL_ENV, "https://av.example.edu/api"),
            (API_TOKEN_ENV, "sekrit"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains(PUBLIC_URL_ENV));
    }

    #[test]
    fn rejects_non_http_public_url() {
        let err = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "ftp://av.example.edu"),
            (SOLR_URL_ENV, "http://solr.internal:8983"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let err = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "https://av.example.edu"),
            (SOLR_URL_ENV, "http://solr.internal:8983"),
            (BIND_ENV, "not-an-address"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains(BIND_ENV));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "https://av.example.edu"),
            (SOLR_URL_ENV, "http://solr.internal:8983"),
            (TIMEOUT_ENV, "0"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains(TIMEOUT_ENV));
    }

    #[test]
    fn optional_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (PUBLIC_URL_ENV, "https://av.example.edu"),
            (SOLR_URL_ENV, "http://solr.internal:8983"),
            (BIND_ENV, "127.0.0.1:8080"),
            (TIMEOUT_ENV, "5"),
            (RETRY_ATTEMPTS_ENV, "1"),
            (RETRY_DELAY_ENV, "0"),
        ]))
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.retry_attempts, 1);
        assert_eq!(config.http.retry_delay, Duration::from_millis(0));
    }
}
