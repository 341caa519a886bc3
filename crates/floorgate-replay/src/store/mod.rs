//! Store - Audit persistence
//!
//! `SqliteAuditStore` uses sqlx for async SQLite access (embedded, no
//! external service required). `MemoryAuditStore` keeps everything in
//! process and is used by tests and the `memory` storage backend.

mod helpers;
mod memory;
mod sqlite;
mod traits;

#[cfg(test)]
mod tests;

pub use helpers::{default_data_dir, default_db_path};
pub use memory::MemoryAuditStore;
pub use sqlite::SqliteAuditStore;
pub use traits::AuditStore;
