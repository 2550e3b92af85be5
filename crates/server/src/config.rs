//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Required only when the store is empty
//! - `ADMIN_PASSWORD` - Initial admin password (min 8 chars), hashed into the
//!   bootstrapped document. Never stored in plaintext.
//!
//! ## Optional
//! - `FLORE_HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 5000)
//! - `FLORE_DATA_PATH` - Store file (default: data/db.json)
//! - `FLORE_STATIC_DIR` - Directory served for paths outside the API
//! - `ANALYTICS_MAX_EVENTS` - Keep at most this many analytics events
//! - `TRUST_PROXY_HEADERS` - `true` to key the login rate limit on
//!   `X-Forwarded-For` and similar headers (default: false). Enable only
//!   behind a proxy that overwrites them.
//! - `LOG_FORMAT` - `pretty` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Fragments that mark a copied-from-docs secret (matched case-insensitively).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "xxx",
    "todo",
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

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the JSON store file
    pub data_path: PathBuf,
    /// Directory served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Initial admin password, used only to bootstrap an empty store
    pub admin_password: Option<SecretString>,
    /// Analytics retention bound
    pub analytics_max_events: Option<NonZeroUsize>,
    /// Take the client IP from proxy headers instead of the socket peer
    pub trust_proxy_headers: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Sentry configuration. Disabled when no DSN is set.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let jwt_secret = vars.required("JWT_SECRET")?;
        check_signing_secret(&jwt_secret, "JWT_SECRET")?;

        let admin_password = vars.optional("ADMIN_PASSWORD");
        if let Some(password) = &admin_password {
            validate_admin_password(password)
                .map_err(|reason| ConfigError::InvalidEnvVar("ADMIN_PASSWORD".to_string(), reason))?;
        }

        let log_format = match vars.optional("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        let sentry_defaults = SentryConfig::default();
        let sentry = SentryConfig {
            dsn: vars.optional("SENTRY_DSN"),
            environment: vars.optional("SENTRY_ENVIRONMENT"),
            sample_rate: vars.sample_rate("SENTRY_SAMPLE_RATE", sentry_defaults.sample_rate)?,
            traces_sample_rate: vars
                .sample_rate("SENTRY_TRACES_SAMPLE_RATE", sentry_defaults.traces_sample_rate)?,
        };

        Ok(Self {
            host: vars.parse_or("FLORE_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: vars.parse_or("PORT", 5000)?,
            data_path: vars.parse_or("FLORE_DATA_PATH", PathBuf::from("data/db.json"))?,
            static_dir: vars.optional("FLORE_STATIC_DIR").map(PathBuf::from),
            jwt_secret: SecretString::from(jwt_secret),
            admin_password: admin_password.map(SecretString::from),
            analytics_max_events: vars.parse_opt("ANALYTICS_MAX_EVENTS")?,
            trust_proxy_headers: vars.parse_or("TRUST_PROXY_HEADERS", false)?,
            log_format,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// A configuration for tests: ephemeral port, the given store path and
    /// a fixed high-entropy secret.
    #[must_use]
    pub fn for_tests(data_path: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            data_path: data_path.into(),
            static_dir: None,
            jwt_secret: SecretString::from("k7Q!v2#Lp9@xR4$mZ8&nB1^tW6*hC3%yF5"),
            admin_password: None,
            analytics_max_events: None,
            trust_proxy_headers: false,
            log_format: LogFormat::Pretty,
            sentry: SentryConfig::default(),
        }
    }
}

/// Check an admin password against the minimum requirements.
///
/// # Errors
///
/// Returns a human-readable reason when the password is too short.
pub fn validate_admin_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters (got {len})"
        ));
    }
    Ok(())
}

/// Variable source with empty values treated as unset.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }

    /// A Sentry sample rate in `[0.0, 1.0]`.
    fn sample_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let rate = self.parse_or(key, default)?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ));
        }
        Ok(rate)
    }
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, u32> = HashMap::new();
    let mut len = 0_u32;
    for c in s.chars() {
        *freq.entry(c).or_default() += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }

    let len = f64::from(len);
    freq.values()
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject signing secrets that are short, copied placeholders, or low entropy.
fn check_signing_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| ConfigError::InsecureSecret(var_name.to_string(), reason);

    let len = secret.chars().count();
    if len < MIN_JWT_SECRET_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {len})"
        )));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!(
            "appears to be a placeholder (contains '{pattern}')"
        )));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
        )));
    }

    Ok(())
}
