//! Catalog proxy configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (per request)
//! - `PRINTIFY_API_KEY` - Printify personal access token
//! - `PRINTIFY_SHOP_ID` - Printify shop identifier
//!
//! These are read on every request rather than at startup, so a missing value
//! fails requests instead of preventing the server from booting.
//!
//! ## Optional
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 3000)
//! - `PRINTIFY_API_BASE_URL` - Upstream base URL (default: <https://api.printify.com>)
//! - `CATALOG_CACHE_TTL_SECS` - Cache entry lifetime (default: 300)
//! - `CATALOG_CACHE_MAX_ENTRIES` - Cache capacity bound (default: 1000)
//! - `CATALOG_LOG_JSON` - Emit JSON log lines when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Environment variable holding the Printify API key.
pub const API_KEY_VAR: &str = "PRINTIFY_API_KEY";

/// Environment variable holding the Printify shop ID.
pub const SHOP_ID_VAR: &str = "PRINTIFY_SHOP_ID";

const DEFAULT_API_BASE_URL: &str = "https://api.printify.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing Printify credentials in environment")]
    MissingCredentials,
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog proxy startup configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Printify API configuration
    pub printify: PrintifyConfig,
    /// Response cache configuration
    pub cache: CacheConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Printify API configuration.
#[derive(Debug, Clone)]
pub struct PrintifyConfig {
    /// Base URL the `/v1/...` paths are appended to
    pub api_base_url: Url,
}

/// Response cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long a stored response stays fresh
    pub ttl: Duration,
    /// Upper bound on stored responses
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300), // 5 minutes
            max_entries: 1000,
        }
    }
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an optional variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("CATALOG_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("CATALOG_PORT", "3000")?;

        Ok(Self {
            host,
            port,
            printify: PrintifyConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            log_json: get_optional_env("CATALOG_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PrintifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("PRINTIFY_API_BASE_URL", DEFAULT_API_BASE_URL);
        Ok(Self {
            api_base_url: parse_base_url(&raw, "PRINTIFY_API_BASE_URL")?,
        })
    }
}

impl CacheConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let ttl_secs = parse_env_or_default::<u64>("CATALOG_CACHE_TTL_SECS", "300")?;
        let max_entries = parse_env_or_default::<u64>("CATALOG_CACHE_MAX_ENTRIES", "1000")?;

        Ok(Self {
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        })
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Printify credentials needed for a single upstream call.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PrintifyCredentials {
    /// Personal access token sent as a bearer token
    pub api_key: SecretString,
    /// Shop the catalog belongs to
    pub shop_id: String,
}

impl std::fmt::Debug for PrintifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintifyCredentials")
            .field("api_key", &"[REDACTED]")
            .field("shop_id", &self.shop_id)
            .finish()
    }
}

/// Where request-time credentials come from.
#[derive(Clone)]
pub enum CredentialSource {
    /// Read `PRINTIFY_API_KEY` and `PRINTIFY_SHOP_ID` on every call.
    Environment,
    /// Fixed values supplied at construction. `None` behaves like an unset
    /// variable.
    Fixed {
        api_key: Option<SecretString>,
        shop_id: Option<String>,
    },
}

impl CredentialSource {
    /// Fixed credentials with both values present.
    #[must_use]
    pub fn fixed(api_key: impl Into<String>, shop_id: impl Into<String>) -> Self {
        Self::Fixed {
            api_key: Some(SecretString::from(api_key.into())),
            shop_id: Some(shop_id.into()),
        }
    }

    /// Resolve the credentials for the current request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if either value is missing or
    /// empty.
    pub fn resolve(&self) -> Result<PrintifyCredentials, ConfigError> {
        match self {
            Self::Environment => {
                let api_key = get_optional_env(API_KEY_VAR).map(SecretString::from);
                let shop_id = get_optional_env(SHOP_ID_VAR);
                build_credentials(api_key, shop_id)
            }
            Self::Fixed { api_key, shop_id } => build_credentials(api_key.clone(), shop_id.clone()),
        }
    }
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => f.write_str("Environment"),
            Self::Fixed { api_key, shop_id } => f
                .debug_struct("Fixed")
                .field("api_key", &api_key.as_ref().map(|_| "[REDACTED]"))
                .field("shop_id", shop_id)
                .finish(),
        }
    }
}

fn build_credentials(
    api_key: Option<SecretString>,
    shop_id: Option<String>,
) -> Result<PrintifyCredentials, ConfigError> {
    use secrecy::ExposeSecret;

    match (api_key, shop_id) {
        (Some(api_key), Some(shop_id))
            if !api_key.expose_secret().is_empty() && !shop_id.is_empty() =>
        {
            Ok(PrintifyCredentials { api_key, shop_id })
        }
        _ => Err(ConfigError::MissingCredentials),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to a default literal.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an http(s) URL usable as a base for path segments.
fn parse_base_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be an http(s) base URL (got {raw})"),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_fixed_credentials_resolve() {
        let creds = CredentialSource::fixed("key-abc", "12345").resolve().unwrap();
        assert_eq!(creds.api_key.expose_secret(), "key-abc");
        assert_eq!(creds.shop_id, "12345");
    }

    #[test]
    fn test_missing_api_key_is_missing_credentials() {
        let source = CredentialSource::Fixed {
            api_key: None,
            shop_id: Some("12345".to_string()),
        };
        let err = source.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
        assert!(err.to_string().contains("Missing Printify credentials"));
    }

    #[test]
    fn test_missing_shop_id_is_missing_credentials() {
        let source = CredentialSource::Fixed {
            api_key: Some(SecretString::from("key-abc")),
            shop_id: None,
        };
        assert!(matches!(
            source.resolve().unwrap_err(),
            ConfigError::MissingCredentials
        ));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let source = CredentialSource::fixed("", "12345");
        assert!(matches!(
            source.resolve().unwrap_err(),
            ConfigError::MissingCredentials
        ));

        let source = CredentialSource::fixed("key-abc", "");
        assert!(matches!(
            source.resolve().unwrap_err(),
            ConfigError::MissingCredentials
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_api_key() {
        let creds = CredentialSource::fixed("super_secret_token", "12345")
            .resolve()
            .unwrap();
        let debug_output = format!("{creds:?}");

        assert!(debug_output.contains("12345"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));

        let source_output = format!("{:?}", CredentialSource::fixed("super_secret_token", "1"));
        assert!(!source_output.contains("super_secret_token"));
    }

    #[test]
    fn test_parse_base_url_accepts_http_and_https() {
        assert!(parse_base_url("https://api.printify.com", "TEST_VAR").is_ok());
        assert!(parse_base_url("http://127.0.0.1:8080/", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        let err = parse_base_url("mailto:shop@example.com", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = parse_base_url("not a url", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_default_printify_base_url_is_valid() {
        let url = parse_base_url(DEFAULT_API_BASE_URL, "TEST_VAR").unwrap();
        assert_eq!(url.as_str(), "https://api.printify.com/");
    }

    #[test]
    fn test_default_cache_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_entries, 1000);
    }

    #[test]
    fn test_socket_addr() {
        let config = ProxyConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            printify: PrintifyConfig {
                api_base_url: Url::parse("https://api.printify.com").unwrap(),
            },
            cache: CacheConfig::default(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
