//! CLI module for Floorgate
//!
//! Provides commands:
//! - `serve`: run the HTTP server (default)
//! - `submit`, `status`, `audit`, `validate`: layout requests
//! - `reviews`, `claim`, `release`, `resolve`: the review queue
//! - `doctor`: configuration and storage diagnostics
//! - `config`: print the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod doctor;
pub mod layouts;
pub mod reviews;

/// Floorgate CLI
#[derive(Parser, Debug)]
#[command(name = "floorgate")]
#[command(about = "Validation and human-review gate for AI-generated floor plans")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Submit a layout request from a JSON file
    Submit {
        /// Request file
        file: PathBuf,
        /// Correlation id, overriding the one in the file
        #[arg(long)]
        id: Option<String>,
    },
    /// Show the current response for a correlation id
    Status {
        /// Correlation id
        id: String,
    },
    /// Show the audit trail of a correlation id
    Audit {
        /// Correlation id
        id: String,
    },
    /// Validate a proposal against a request without contacting providers
    Validate {
        /// Request file
        request: PathBuf,
        /// Proposal file
        proposal: PathBuf,
    },
    /// List review items
    Reviews {
        /// Only items in this state (pending, in_review, approved, rejected, edited)
        #[arg(long)]
        state: Option<String>,
        /// Only items of this priority (critical, high, normal, low)
        #[arg(long)]
        priority: Option<String>,
        /// At most this many items
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Claim the next review item, or a specific one
    Claim {
        /// Reviewer name
        reviewer: String,
        /// Correlation id of a specific item
        #[arg(long)]
        id: Option<String>,
    },
    /// Hand a claimed review item back to the queue
    Release {
        /// Correlation id
        id: String,
        /// Reviewer name
        reviewer: String,
    },
    /// Resolve a claimed review item
    Resolve {
        /// Correlation id
        id: String,
        /// Reviewer name
        reviewer: String,
        /// approve, reject or edit
        decision: String,
        /// Replacement proposal file, required for edit
        #[arg(long)]
        edited: Option<PathBuf>,
    },
    /// Run configuration and storage diagnostics
    Doctor,
    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Some(Commands::Serve) => crate::server::run(config).await,
        Some(Commands::Submit { file, id }) => layouts::submit(config, &file, id).await,
        Some(Commands::Status { id }) => layouts::status(config, &id).await,
        Some(Commands::Audit { id }) => layouts::audit(config, &id).await,
        Some(Commands::Validate { request, proposal }) => {
            layouts::validate(config, &request, &proposal).await
        }
        Some(Commands::Reviews {
            state,
            priority,
            limit,
        }) => reviews::list(config, state, priority, limit).await,
        Some(Commands::Claim { reviewer, id }) => reviews::claim(config, &reviewer, id).await,
        Some(Commands::Release { id, reviewer }) => reviews::release(config, &id, &reviewer).await,
        Some(Commands::Resolve {
            id,
            reviewer,
            decision,
            edited,
        }) => reviews::resolve(config, &id, &reviewer, &decision, edited.as_deref()).await,
        Some(Commands::Doctor) => doctor::run(config).await,
        Some(Commands::Config) => {
            let config = crate::server::load_config(config)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Read and parse a JSON file
fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> anyhow::Result<T> {
    use anyhow::Context;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Print an engine result as JSON, or the friendly error and exit non-zero
fn print_result<T: serde::Serialize>(result: floorgate_core::Result<T>) -> anyhow::Result<()> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            eprint!("{}", floorgate_core::format_error_for_cli(&e));
            std::process::exit(1);
        }
    }
}
