//! Event - Audit event types for the layout lifecycle
//!
//! Every component of the engine writes one record per lifecycle event.
//! Records are never updated or deleted; a correlation id's history is the
//! ordered list of its records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Request accepted by intake
    Submitted,
    /// A provider was invoked
    ProviderCalled,
    /// A provider timed out or reported an error
    ProviderFailed,
    /// Every provider failed and the rule-based generator was used
    FallbackUsed,
    /// A proposal went through the validation pipeline
    Validated,
    /// The decision engine assigned a disposition
    Decided,
    /// The caller's correction pass was started
    CorrectionRequested,
    /// The attempt was placed on the review queue
    Queued,
    /// A reviewer claimed the item
    Claimed,
    /// A reviewer released a claimed item
    Released,
    /// A reviewer submitted a decision
    Reviewed,
    /// The correlation id reached its terminal state
    Resolved,
    /// The caller cancelled the attempt
    Cancelled,
    /// The attempt exceeded its outer time budget
    TimedOut,
}

impl AuditEventType {
    /// Returns the string representation of the event type
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::ProviderCalled => "provider_called",
            Self::ProviderFailed => "provider_failed",
            Self::FallbackUsed => "fallback_used",
            Self::Validated => "validated",
            Self::Decided => "decided",
            Self::CorrectionRequested => "correction_requested",
            Self::Queued => "queued",
            Self::Claimed => "claimed",
            Self::Released => "released",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "provider_called" => Ok(Self::ProviderCalled),
            "provider_failed" => Ok(Self::ProviderFailed),
            "fallback_used" => Ok(Self::FallbackUsed),
            "validated" => Ok(Self::Validated),
            "decided" => Ok(Self::Decided),
            "correction_requested" => Ok(Self::CorrectionRequested),
            "queued" => Ok(Self::Queued),
            "claimed" => Ok(Self::Claimed),
            "released" => Ok(Self::Released),
            "reviewed" => Ok(Self::Reviewed),
            "resolved" => Ok(Self::Resolved),
            "cancelled" => Ok(Self::Cancelled),
            "timed_out" => Ok(Self::TimedOut),
            _ => Err(format!("unknown audit event type: {s}")),
        }
    }
}

/// One append-only audit row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Correlation id this record belongs to
    pub correlation_id: String,

    /// Position within the correlation id's trail, assigned by the store
    pub sequence_num: i64,

    /// Type of event
    pub event_type: AuditEventType,

    /// Event-specific payload
    pub payload: serde_json::Value,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// Duration in milliseconds (if applicable)
    pub duration_ms: Option<i64>,
}

impl AuditRecord {
    /// Create a new record; the sequence number is assigned on append
    #[must_use]
    pub fn new(correlation_id: impl Into<String>, event_type: AuditEventType) -> Self {
        Self {
            id: Uuid::new_v4(),
            correlation_id: correlation_id.into(),
            sequence_num: 0,
            event_type,
            payload: serde_json::json!({}),
            timestamp: Utc::now(),
            duration_ms: None,
        }
    }

    /// Set the payload
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trips_through_str() {
        for ty in [
            AuditEventType::Submitted,
            AuditEventType::ProviderFailed,
            AuditEventType::FallbackUsed,
            AuditEventType::TimedOut,
        ] {
            let parsed: AuditEventType = ty.as_str().parse().unwrap();
            assert_eq!(parsed, ty);
        }
        assert!("bogus".parse::<AuditEventType>().is_err());
    }

    #[test]
    fn test_record_builder() {
        let record = AuditRecord::new("corr-1", AuditEventType::ProviderCalled)
            .with_payload(serde_json::json!({ "provider": "primary" }))
            .with_duration(42);

        assert_eq!(record.correlation_id, "corr-1");
        assert_eq!(record.sequence_num, 0);
        assert_eq!(record.payload["provider"], "primary");
        assert_eq!(record.duration_ms, Some(42));
    }

    #[test]
    fn test_event_type_serializes_snake_case() {
        let json = serde_json::to_string(&AuditEventType::CorrectionRequested).unwrap();
        assert_eq!(json, "\"correction_requested\"");
    }
}
