//! Error types for floorgate-llm

use thiserror::Error;

/// Provider error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider not configured
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// API error reported by the provider
    #[error("api error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// The provider answered with something that is not a layout
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// The caller cancelled the call
    #[error("cancelled")]
    Cancelled,

    /// The rule-based fallback generator failed
    #[error("fallback generator error: {0}")]
    Fallback(String),
}

impl Error {
    /// Whether a retry against the same provider could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Network(_) | Self::Timeout(_) | Self::Api(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
