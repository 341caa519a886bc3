//! Floorgate Replay - Audit Trail
//!
//! This crate provides the persistence layer for Floorgate:
//! - Event: audit event types and records
//! - Store: append-only audit log, terminal-response cache and review-item
//!   snapshots (SQLite or in-memory)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod store;

pub use error::{Error, Result};
pub use event::{AuditEventType, AuditRecord};
pub use store::{default_data_dir, default_db_path, AuditStore, MemoryAuditStore, SqliteAuditStore};
