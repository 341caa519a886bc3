//! Review queue commands

use super::{print_result, read_json};
use crate::server::{build_engine, load_config};
use anyhow::{anyhow, Result};
use floorgate_core::{ReviewDecision, ReviewFilter, ReviewPriority, ReviewState};
use floorgate_llm::LayoutProposal;
use std::path::Path;

pub async fn list(
    config: Option<&Path>,
    state: Option<String>,
    priority: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let filter = ReviewFilter {
        state: state
            .map(|s| s.parse::<ReviewState>())
            .transpose()
            .map_err(|e| anyhow!(e))?,
        priority: priority
            .map(|p| p.parse::<ReviewPriority>())
            .transpose()
            .map_err(|e| anyhow!(e))?,
        reviewer: None,
        limit,
    };

    let engine = build_engine(&load_config(config)?).await?;
    let items = engine.list_pending_reviews(&filter).await;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

pub async fn claim(config: Option<&Path>, reviewer: &str, id: Option<String>) -> Result<()> {
    let engine = build_engine(&load_config(config)?).await?;
    let claimed = match id {
        Some(id) => engine.claim_review_by_id(&id, reviewer).await,
        None => engine.claim_review(reviewer).await,
    };

    match claimed {
        Ok(None) => {
            println!("Nothing to claim.");
            Ok(())
        }
        other => print_result(other),
    }
}

pub async fn release(config: Option<&Path>, id: &str, reviewer: &str) -> Result<()> {
    let engine = build_engine(&load_config(config)?).await?;
    print_result(engine.release_review(id, reviewer).await)
}

pub async fn resolve(
    config: Option<&Path>,
    id: &str,
    reviewer: &str,
    decision: &str,
    edited: Option<&Path>,
) -> Result<()> {
    let decision: ReviewDecision = decision.parse().map_err(|e: String| anyhow!(e))?;
    let edited: Option<LayoutProposal> = edited.map(read_json).transpose()?;

    let engine = build_engine(&load_config(config)?).await?;
    print_result(engine.resolve_review(id, reviewer, decision, edited).await)
}
