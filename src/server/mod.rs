//! Server module for Floorgate
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Configuration checks before startup
//! - `init`: Engine construction and the HTTP run loop

pub mod config;
mod init;
mod loader;
mod validation;

pub use init::{app, build_engine, run};
pub use loader::load_config;
pub use validation::validate_config;
