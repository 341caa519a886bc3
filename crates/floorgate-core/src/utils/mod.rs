//! Utility modules for floorgate-core
//!
//! - retry: bounded exponential backoff for persistence writes

mod retry;

pub use retry::{retry_with_backoff, RetryConfig, RetryError};
