//! Floorgate Core - Layout Validation Engine
//!
//! This crate turns AI-generated floor-plan proposals into auditable
//! decisions, including:
//! - Intake: schema checks, correlation ids and per-id locking
//! - Orchestrator: ranked provider chain with timeouts and fallback
//! - Validation: geometry, spatial, regulatory and confidence checks
//! - Decision: disposition state machine and the human-review policy
//! - Review: priority queue with exclusive claims
//! - Persistence: retrying audit writes, terminal-response cache
//! - Engine: the submit / status / review surface

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod intake;
pub mod orchestrator;
pub mod persistence;
pub mod review;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use config::EngineConfig;
pub use decision::{AttemptState, DecisionEngine, DecisionPolicy};
pub use engine::{evaluate_offline, Engine, LayoutResponse, ReviewHandle};
pub use error::{format_error_for_cli, Error, Result, SchemaError, UserFriendlyError};
pub use intake::{accept, validate_schema, CorrelationLocks};
pub use orchestrator::{OrchestratorConfig, ProviderChain};
pub use persistence::{Persistence, PersistenceConfig};
pub use review::{
    ReviewDecision, ReviewError, ReviewFilter, ReviewItem, ReviewPriority, ReviewQueue,
    ReviewState, SharedReviewQueue,
};
pub use utils::{retry_with_backoff, RetryConfig, RetryError};
pub use validation::{
    RuleSet, RuleSetLookup, Severity, StaticRuleBook, ValidationConfig, ValidationError,
    ValidationPipeline, ValidationResult, ValidationStatus,
};
