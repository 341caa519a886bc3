//! Orchestrator - Ranked provider chain with fallover
//!
//! Providers are tried in configured order, each under its own timeout.
//! A timeout or provider error is audited and the next provider is tried.
//! When every provider has failed, the deterministic fallback generator
//! produces the proposal and marks it `used_fallback`.

mod chain;
mod config;

pub use chain::ProviderChain;
pub use config::OrchestratorConfig;
