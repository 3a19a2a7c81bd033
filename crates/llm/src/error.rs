//! Error types for completion providers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Why a completion request failed.
///
/// The variant decides the retry behaviour: rate limits back off
/// exponentially, transient failures retry after a fixed delay, everything
/// else fails immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No credentials or an unusable configuration.
    #[error("AI provider not configured: {0}")]
    Unconfigured(String),

    /// HTTP 429 or an explicit rate limit message.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Server errors, connection failures, timeouts.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Authentication and other client errors. Not retried.
    #[error("request rejected: {0}")]
    Fatal(String),

    /// The provider answered but the body was unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited(_)
                | ProviderError::Transient(_)
                | ProviderError::InvalidResponse(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ProviderError::Transient(e.to_string())
        } else if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else {
            ProviderError::Fatal(e.to_string())
        }
    }
}
