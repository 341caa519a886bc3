//! Error types for floorgate-core
//!
//! This module provides error types and user-friendly error formatting.
//! Validation findings are not errors; they are data on `ValidationResult`.

use crate::review::ReviewError;
use thiserror::Error;

/// Reasons a request is rejected before any provider is contacted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The room program is empty
    #[error("room program is empty")]
    EmptyRoomProgram,

    /// A room has no name
    #[error("room #{index} has no name")]
    BlankRoomName {
        /// Position in the program
        index: usize,
    },

    /// A room's required area is zero, negative or not a number
    #[error("room '{room}' has non-positive area {area}")]
    NonPositiveArea {
        /// Room name
        room: String,
        /// Offending area
        area: f64,
    },

    /// Adjacency hint names a room that is not in the program
    #[error("room '{room}' must be adjacent to unknown room '{target}'")]
    UnknownAdjacency {
        /// Room declaring the hint
        room: String,
        /// Missing target
        target: String,
    },

    /// Measurement system not recognised
    #[error("unknown measurement system")]
    UnknownMeasurementSystem,

    /// No region given
    #[error("region is empty")]
    MissingRegion,

    /// Caller-supplied correlation id is blank
    #[error("correlation id is blank")]
    BlankCorrelationId,
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Every provider and the fallback generator failed
    #[error("provider chain exhausted: {0}")]
    ProviderChainExhausted(String),

    /// The attempt exceeded its outer time budget
    #[error("attempt {correlation_id} timed out after {budget_ms}ms")]
    Timeout {
        /// Correlation id of the attempt
        correlation_id: String,
        /// Budget that was exceeded
        budget_ms: u64,
    },

    /// The caller cancelled the attempt
    #[error("attempt {0} cancelled")]
    Cancelled(String),

    /// Persistence failed after retries; the attempt fails closed
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Unknown correlation id
    #[error("not found: {0}")]
    NotFound(String),

    /// The correlation id is still being processed
    #[error("correlation id {0} is still in progress")]
    InProgress(String),

    /// Review queue operation failed
    #[error("review error: {0}")]
    Review(#[from] ReviewError),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] floorgate_llm::Error),

    /// Replay/audit store error
    #[error("replay error: {0}")]
    Replay(#[from] floorgate_replay::Error),

    /// Internal error (serialization, illegal state transitions)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller is at fault and should fix the request
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::NotFound(_) | Self::Review(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
///
/// Provides human-readable error messages and suggestions for fixing.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Schema(e) => format!("📐 The layout request is malformed: {}", e),
            Error::ProviderChainExhausted(msg) => {
                format!("🤖 No layout could be generated: {}", msg)
            }
            Error::Timeout { budget_ms, .. } => {
                format!("⏳ Layout generation exceeded its {}ms budget.", budget_ms)
            }
            Error::Cancelled(id) => format!("🛑 Request {} was cancelled.", id),
            Error::Persistence(msg) => format!("💾 Audit storage failed: {}", msg),
            Error::NotFound(id) => format!("🔍 Nothing is recorded for '{}'.", id),
            Error::InProgress(id) => format!("⚙️ Request {} is still being processed.", id),
            Error::Review(e) => format!("✋ Review action refused: {}", e),
            Error::Llm(e) => format!("🤖 Provider error: {}", e),
            Error::Replay(e) => format!("📼 Audit store error: {}", e),
            Error::Internal(msg) => format!("❌ Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Schema(_) => Some(
                "💡 Every room needs a name and a positive area; use 'metric' or 'imperial'."
                    .to_string(),
            ),
            Error::ProviderChainExhausted(_) => Some(
                "💡 Check the [[providers]] entries and the fallback generator configuration."
                    .to_string(),
            ),
            Error::Timeout { .. } => Some(
                "💡 Raise orchestrator.provider_timeout_ms or fallback_timeout_ms.".to_string(),
            ),
            Error::Persistence(_) => {
                Some("💡 Check that the storage path is writable and not locked.".to_string())
            }
            Error::InProgress(_) => Some("💡 Poll the status again shortly.".to_string()),
            Error::Review(ReviewError::NotClaimedBy { .. }) => {
                Some("💡 Claim the item before resolving or releasing it.".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = String::new();

    output.push_str(&error.user_message());
    output.push_str("\n\n");

    if let Some(suggestion) = error.suggestion() {
        output.push_str(&suggestion);
        output.push('\n');
    }

    output
}
