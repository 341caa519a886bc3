//! Floorgate LLM - AI Provider Capabilities
//!
//! This crate defines what the engine exchanges with layout generators:
//! - Request: `LayoutRequest`, room program, AI options, correlation ids
//! - Proposal: walls, doors, windows, rooms and floors as produced by a model
//! - Provider: the `LayoutProvider` and `FallbackGenerator` capabilities
//! - Adapters: scripted mock, file-backed fixture provider and a deterministic
//!   strip-layout fallback generator

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fallback;
pub mod fixture;
pub mod mock;
pub mod proposal;
pub mod provider;
pub mod request;

pub use error::{Error, Result};
pub use fallback::StripFallbackGenerator;
pub use fixture::FixtureProvider;
pub use mock::{MockBehavior, MockProvider};
pub use proposal::{
    Floor, LayoutProposal, Opening, Point, ProposalMetadata, Room, Wall,
};
pub use provider::{FallbackGenerator, LayoutProvider, ProposalRequest};
pub use request::{AiOptions, CorrelationId, LayoutRequest, MeasurementSystem, RoomProgram};
