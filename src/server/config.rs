//! Server configuration types
//!
//! Contains all configuration structures for the Floorgate binary. Engine
//! sections deserialize straight into the core crate's config types.

use anyhow::{Context, Result};
use floorgate_core::{
    DecisionPolicy, EngineConfig, OrchestratorConfig, PersistenceConfig, RuleSet,
    ValidationConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub decision: DecisionPolicy,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Ranked AI providers, highest priority first
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Regional building rules
    #[serde(default)]
    pub rule_sets: Vec<RuleSet>,
}

impl AppConfig {
    /// Engine sections as one core config
    pub fn engine(&self) -> EngineConfig {
        EngineConfig::new()
            .with_orchestrator(self.orchestrator.clone())
            .with_validation(self.validation.clone())
            .with_decision(self.decision.clone())
            .with_persistence(self.persistence.clone())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Audit store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file; defaults to `~/.floorgate/floorgate.db`
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        self.path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(floorgate_replay::default_db_path)
    }
}

/// Behaviour of a `mock` provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockMode {
    #[default]
    Fail,
    Hang,
}

/// One entry of the provider chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Replays a recorded proposal file
    Fixture { name: String, path: String },
    /// Scripted provider for exercising fallover
    Mock {
        name: String,
        #[serde(default)]
        mode: MockMode,
    },
}

impl ProviderConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Fixture { name, .. } | Self::Mock { name, .. } => name,
        }
    }
}
