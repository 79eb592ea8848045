//! Configuration types for dreamdns
//!
//! Configuration is read from the environment once at startup and passed
//! explicitly into the components that need it.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "DREAMHOST_API_KEY";

/// Environment variable overriding the provider endpoint
pub const ENV_API_URL: &str = "DREAMDNS_API_URL";

/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "DREAMDNS_TIMEOUT_SECS";

/// Environment variable selecting the default log level
pub const ENV_LOG_LEVEL: &str = "DREAMDNS_LOG_LEVEL";

/// Environment variable selecting the run mode (`dry-run` or `live`)
pub const ENV_MODE: &str = "DREAMDNS_MODE";

/// Default DreamHost API endpoint
pub const DEFAULT_API_URL: &str = "https://api.dreamhost.com/";

/// Default timeout for a single provider request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider API key
///
/// The value is never printed: both `Debug` and `Display` redact it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential, rejecting empty or blank values
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(Error::config(format!("{ENV_API_KEY} cannot be empty")));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Raw credential, for attaching to outgoing requests only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<REDACTED>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

/// Main dreamdns configuration
#[derive(Debug, Clone)]
pub struct DreamdnsConfig {
    /// Provider API key
    pub api_key: ApiKey,

    /// Provider API endpoint
    pub api_url: String,

    /// Timeout for each provider request (in seconds)
    pub timeout_secs: u64,

    /// If true, list records but only log the mutations that would be made
    pub dry_run: bool,

    /// Log level requested through the environment, if any
    pub log_level: Option<String>,
}

impl DreamdnsConfig {
    /// Create a configuration with defaults for everything but the key
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dry_run: false,
            log_level: None,
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Tests pass a closure over a map instead of touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| {
            Error::config(format!(
                "{ENV_API_KEY} is required. Set it via: export {ENV_API_KEY}=your_key"
            ))
        })?;
        let mut config = Self::new(ApiKey::new(api_key)?);

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be a number of seconds. Got: {raw}"))
            })?;
        }

        config.dry_run = lookup(ENV_MODE)
            .map(|mode| mode.trim().eq_ignore_ascii_case("dry-run"))
            .unwrap_or(false);

        config.log_level = lookup(ENV_LOG_LEVEL).filter(|l| !l.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(Error::config(format!(
                "{ENV_API_URL} must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(Error::config(format!(
                "{ENV_TIMEOUT_SECS} must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
