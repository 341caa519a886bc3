//! Helper functions for store module

use crate::error::Error;
use crate::event::{AuditEventType, AuditRecord};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Convert a SQLite row to an AuditRecord
pub(crate) fn row_to_record(row: SqliteRow) -> Result<AuditRecord, Error> {
    let id_str: String = row.get("id");
    let event_type_str: String = row.get("event_type");
    let payload_str: String = row.get("payload");
    let timestamp_str: String = row.get("timestamp");

    let id =
        Uuid::parse_str(&id_str).map_err(|e| Error::Serialization(format!("invalid uuid: {e}")))?;
    let event_type: AuditEventType = event_type_str
        .parse()
        .map_err(|e: String| Error::Serialization(e))?;
    let payload: serde_json::Value = serde_json::from_str(&payload_str)
        .map_err(|e| Error::Serialization(format!("invalid json: {e}")))?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))?
        .with_timezone(&Utc);

    Ok(AuditRecord {
        id,
        correlation_id: row.get("correlation_id"),
        sequence_num: row.get("sequence_num"),
        event_type,
        payload,
        timestamp,
        duration_ms: row.get("duration_ms"),
    })
}

/// Get the default data directory for Floorgate
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".floorgate"))
        .unwrap_or_else(|| std::path::PathBuf::from(".floorgate"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("floorgate.db")
}
