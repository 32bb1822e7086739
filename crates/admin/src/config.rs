//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROYA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ROYA_SESSION_SECRET` - Session cookie signing key (min 64 chars, high entropy)
//! - `ROYA_ADMIN_USERNAME` - Username of the admin created on first visit
//! - `ROYA_ADMIN_PASSWORD` - Password of the admin created on first visit
//!
//! ## Optional
//! - `ROYA_HOST` - Bind address (default: 127.0.0.1)
//! - `ROYA_PORT` - Listen port (falls back to `PORT`, default: 3000)
//! - `ROYA_BASE_URL` - Public URL (default: `http://localhost:<port>`)
//! - `ROYA_DATE_STYLE` - Basket time calendar, `jalali` or `gregorian` (default: jalali)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use roya_core::DateStyle;
use secrecy::SecretString;
use thiserror::Error;

/// Signed cookies need a 64-byte key.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_PORT: &str = "3000";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https://` enables secure cookies
    pub base_url: String,
    /// Session cookie signing key
    pub session_secret: SecretString,
    /// Credentials for the admin created when no user exists
    pub bootstrap: BootstrapAdmin,
    /// Calendar used to display basket times
    pub date_style: DateStyle,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Bootstrap admin credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does
    /// not parse, or the session secret is too short, looks like a
    /// placeholder or has too little entropy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = env_var("ROYA_DATABASE_URL")
            .or_else(|| env_var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("ROYA_DATABASE_URL".to_owned()))?;

        let host: IpAddr = parse_env("ROYA_HOST", env_var("ROYA_HOST"), "127.0.0.1")?;
        let port: u16 = parse_env(
            "ROYA_PORT",
            env_var("ROYA_PORT").or_else(|| env_var("PORT")),
            DEFAULT_PORT,
        )?;
        let base_url =
            env_var("ROYA_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));
        let date_style: DateStyle =
            parse_env("ROYA_DATE_STYLE", env_var("ROYA_DATE_STYLE"), "jalali")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret: session_secret("ROYA_SESSION_SECRET")?,
            bootstrap: BootstrapAdmin::from_env()?,
            date_style,
            sentry_dsn: env_var("SENTRY_DSN"),
            sentry_environment: env_var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env_var("SENTRY_SAMPLE_RATE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: env_var("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.1),
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BootstrapAdmin {
    fn from_env() -> Result<Self, ConfigError> {
        let username = required("ROYA_ADMIN_USERNAME")?;
        if username.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ROYA_ADMIN_USERNAME".to_owned(),
                "must not be blank".to_owned(),
            ));
        }

        Ok(Self {
            username,
            password: required("ROYA_ADMIN_PASSWORD").map(SecretString::from)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A set, non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn required(key: &str) -> Result<String, ConfigError> {
    env_var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Parse `value`, or `default` when unset.
fn parse_env<T>(key: &str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Load the cookie signing secret and reject weak values.
fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = required(key)?;
    check_secret(&value).map_err(|reason| ConfigError::InsecureSecret(key.to_owned(), reason))?;
    Ok(SecretString::from(value))
}

/// Length, placeholder and entropy checks for a signing secret.
fn check_secret(secret: &str) -> Result<(), String> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(format!(
            "must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {})",
            secret.len()
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_default() += 1;
    }
    let total: u32 = freq.values().sum();
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    freq.values()
        .map(|&count| {
            let p = f64::from(count) / total;
            -p * p.log2()
        })
        .sum()
}
