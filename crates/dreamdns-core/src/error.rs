//! Error types for dreamdns
//!
//! Every failure a reconciliation can hit is one of these variants. Provider
//! calls are classified as [`Error::Transport`], [`Error::Protocol`] or
//! [`Error::Api`] so callers can tell a flaky network from a request that
//! will fail again unchanged.

use thiserror::Error;

/// Result type alias for dreamdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dreamdns
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (credential, endpoint, timeouts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP exchange itself failed
    ///
    /// Covers connect errors, timeouts, unreadable bodies and non-2xx
    /// responses that carry no provider error payload.
    #[error("Transport error during {command} ({url}): {message}")]
    Transport {
        /// Provider command being invoked
        command: String,
        /// Request URL with the credential redacted
        url: String,
        /// Underlying failure
        message: String,
    },

    /// The response body is not the structured format the provider promises
    #[error("Protocol error during {command}: unexpected response body: {body}")]
    Protocol {
        /// Provider command being invoked
        command: String,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The provider answered with an explicit error status
    #[error("API error during {command}: {reason}")]
    Api {
        /// Provider command being invoked
        command: String,
        /// Provider-supplied error code or reason
        reason: String,
        /// Full response payload
        payload: String,
    },

    /// Public IP detection failed
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Invalid input supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(
        command: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            command: command.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(command: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Protocol {
            command: command.into(),
            body: body.into(),
        }
    }

    /// Create a provider-reported API error
    pub fn api(
        command: impl Into<String>,
        reason: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::Api {
            command: command.into(),
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether repeating the same request later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::IpSource(_))
    }

    /// Whether this error was raised before any network call was attempted
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
