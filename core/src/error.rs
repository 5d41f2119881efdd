//! Error types for the news API client.
//!
//! # Design
//! The screen only distinguishes two failure kinds (transport and provider),
//! but the variants keep enough detail for the diagnostic log: the HTTP
//! status, the provider's error `code`, and its `message` when the body
//! carried one.

use thiserror::Error;

/// Errors returned by `NewsClient` parse methods and `Transport`
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The body parsed but its `status` field was not `"ok"`.
    #[error("provider returned status {:?} ({}): {}", .status, .code.as_deref().unwrap_or("no code"), .message.as_deref().unwrap_or("no message"))]
    Provider {
        status: String,
        code: Option<String>,
        message: Option<String>,
    },

    /// The response body could not be deserialized into a provider response.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The configured base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// The two failure kinds visible to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Network failure, non-2xx status, or an unreadable body.
    Transport,
    /// The provider reported a non-`ok` status.
    Provider,
}

impl ApiError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            ApiError::Provider { .. } => FetchErrorKind::Provider,
            ApiError::Transport(_)
            | ApiError::Http { .. }
            | ApiError::Deserialization(_)
            | ApiError::InvalidBaseUrl { .. } => FetchErrorKind::Transport,
        }
    }
}

/// Errors raised while reading `NewsConfig` from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
