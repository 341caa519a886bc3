//! Layout commands

use super::{print_result, read_json};
use crate::server::load_config;
use anyhow::Result;
use floorgate_core::{evaluate_offline, StaticRuleBook};
use floorgate_llm::{CorrelationId, LayoutProposal, LayoutRequest};
use std::path::Path;
use std::sync::Arc;

pub async fn submit(config: Option<&Path>, file: &Path, id: Option<String>) -> Result<()> {
    let mut request: LayoutRequest = read_json(file)?;
    if let Some(id) = id {
        request.correlation_id = Some(CorrelationId::new(id));
    }

    let config = load_config(config)?;
    let engine = crate::server::build_engine(&config).await?;
    print_result(engine.submit(request).await)
}

pub async fn status(config: Option<&Path>, id: &str) -> Result<()> {
    let config = load_config(config)?;
    let engine = crate::server::build_engine(&config).await?;
    print_result(engine.get_status(id).await)
}

pub async fn audit(config: Option<&Path>, id: &str) -> Result<()> {
    let config = load_config(config)?;
    let engine = crate::server::build_engine(&config).await?;
    print_result(engine.audit_trail(id).await)
}

/// Offline validation; nothing is stored
pub async fn validate(config: Option<&Path>, request: &Path, proposal: &Path) -> Result<()> {
    let request: LayoutRequest = read_json(request)?;
    let proposal: LayoutProposal = read_json(proposal)?;

    let config = load_config(config)?;
    let rules = Arc::new(StaticRuleBook::new(config.rule_sets.iter().cloned()));
    print_result(evaluate_offline(&config.engine(), rules, &request, &proposal).await)
}
