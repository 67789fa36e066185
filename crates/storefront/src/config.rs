//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (unless `LUXE_CONTENT_FIXTURES` is set)
//! - `COSMIC_BUCKET_SLUG` - Cosmic bucket holding the boutique content
//! - `COSMIC_READ_KEY` - Bucket read key
//!
//! ## Optional
//! - `COSMIC_API_ENVIRONMENT` - `production` (default) or `staging`
//! - `COSMIC_API_URL` - Override the API base URL entirely
//! - `LUXE_CONTENT_FIXTURES` - Serve content from a local JSON file instead of Cosmic
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Cosmic production API base URL.
pub const COSMIC_PRODUCTION_API_URL: &str = "https://api.cosmicjs.com/v3";
/// Cosmic staging API base URL.
pub const COSMIC_STAGING_API_URL: &str = "https://api.cosmic-staging.com/v3";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where catalog content comes from
    pub content: ContentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Content backend selection.
#[derive(Debug, Clone)]
pub enum ContentConfig {
    /// Live Cosmic bucket.
    Cosmic(CosmicConfig),
    /// Local JSON fixtures file (development and demos).
    Fixtures(PathBuf),
}

/// Cosmic environment the bucket lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CosmicEnvironment {
    #[default]
    Production,
    Staging,
}

impl CosmicEnvironment {
    /// API base URL for this environment.
    #[must_use]
    pub const fn api_url(self) -> &'static str {
        match self {
            Self::Production => COSMIC_PRODUCTION_API_URL,
            Self::Staging => COSMIC_STAGING_API_URL,
        }
    }
}

impl FromStr for CosmicEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            other => Err(format!("expected `production` or `staging`, got `{other}`")),
        }
    }
}

/// Cosmic bucket credentials and endpoint.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct CosmicConfig {
    /// Bucket slug
    pub bucket_slug: String,
    /// Read key, sent with every query
    pub read_key: SecretString,
    /// API base URL (e.g., `https://api.cosmicjs.com/v3`)
    pub api_url: String,
}

impl std::fmt::Debug for CosmicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicConfig")
            .field("bucket_slug", &self.bucket_slug)
            .field("read_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let content = ContentConfig::from_env()?;

        Ok(Self {
            host,
            port,
            content,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default::<f32>(
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ContentConfig {
    /// Load the content backend settings.
    ///
    /// `LUXE_CONTENT_FIXTURES` wins over the Cosmic variables when set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if Cosmic credentials are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(path) = get_optional_env("LUXE_CONTENT_FIXTURES") {
            return Ok(Self::Fixtures(PathBuf::from(path)));
        }
        Ok(Self::Cosmic(CosmicConfig::from_env()?))
    }
}

impl CosmicConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let environment =
            parse_env_or_default::<CosmicEnvironment>("COSMIC_API_ENVIRONMENT", "production")?;
        let api_url = get_optional_env("COSMIC_API_URL")
            .unwrap_or_else(|| environment.api_url().to_string());

        Ok(Self {
            bucket_slug: get_required_env("COSMIC_BUCKET_SLUG")?,
            read_key: get_validated_secret("COSMIC_READ_KEY")?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to a default.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .as_deref()
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    // Bucket keys are random strings; low entropy means a hand-typed value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the key from the bucket settings."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
