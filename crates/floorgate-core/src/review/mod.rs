//! Review - Human review queue
//!
//! Proposals that need a human decision wait here. Reviewers claim items
//! exclusively, then approve, reject or replace them with an edit.

use std::sync::Arc;

pub mod manager;
pub mod types;

pub use manager::ReviewQueue;
pub use types::{
    ReviewDecision, ReviewError, ReviewFilter, ReviewItem, ReviewPriority, ReviewState,
};

/// Shared review queue type
pub type SharedReviewQueue = Arc<ReviewQueue>;

#[cfg(test)]
mod tests;
