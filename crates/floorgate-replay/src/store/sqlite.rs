//! SqliteAuditStore - SQLite-based audit storage

use super::helpers::row_to_record;
use super::traits::AuditStore;
use crate::error::{Error, Result};
use crate::event::AuditRecord;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Audit store persisting records, terminal responses and review items to SQLite
#[derive(Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    /// Create a new store with the given connection pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new store from a database path
    ///
    /// This will create the database file if it doesn't exist and run migrations.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        info!("SQLite audit store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create a new in-memory store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        debug!("In-memory SQLite audit store initialized");
        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS audit_events (
                id TEXT PRIMARY KEY,
                correlation_id TEXT NOT NULL,
                sequence_num INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                payload TEXT NOT NULL DEFAULT '{}',
                timestamp TEXT NOT NULL,
                duration_ms INTEGER
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_audit_events_sequence
            ON audit_events(correlation_id, sequence_num)
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS terminal_responses (
                correlation_id TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS review_items (
                correlation_id TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Database(e.to_string()))?;
        }

        debug!("Database migrations completed");
        Ok(())
    }

    /// Get a reference to the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Count records for a correlation id
    #[instrument(skip(self))]
    pub async fn count_records(&self, correlation_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM audit_events WHERE correlation_id = ?1")
            .bind(correlation_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.get("count"))
    }
}

#[async_trait::async_trait]
impl AuditStore for SqliteAuditStore {
    #[instrument(skip(self, record), fields(correlation_id = %record.correlation_id, event = %record.event_type))]
    async fn append(&self, mut record: AuditRecord) -> Result<AuditRecord> {
        // Sequence assignment and insert happen in one statement so concurrent
        // writers for the same correlation id cannot collide.
        let row = sqlx::query(
            r#"
            INSERT INTO audit_events (
                id, correlation_id, sequence_num, event_type, payload, timestamp, duration_ms
            )
            SELECT ?1, ?2, COALESCE(MAX(sequence_num), 0) + 1, ?3, ?4, ?5, ?6
            FROM audit_events WHERE correlation_id = ?2
            RETURNING sequence_num
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.correlation_id)
        .bind(record.event_type.as_str())
        .bind(record.payload.to_string())
        .bind(record.timestamp.to_rfc3339())
        .bind(record.duration_ms)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        record.sequence_num = row.get("sequence_num");
        debug!(sequence = record.sequence_num, "Appended audit record");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn trail(&self, correlation_id: &str) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, correlation_id, sequence_num, event_type, payload, timestamp, duration_ms
            FROM audit_events
            WHERE correlation_id = ?1
            ORDER BY sequence_num ASC
            "#,
        )
        .bind(correlation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(row_to_record).collect()
    }

    #[instrument(skip(self, payload))]
    async fn insert_terminal(&self, correlation_id: &str, payload: &str) -> Result<String> {
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO terminal_responses (correlation_id, payload, recorded_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(correlation_id)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?
        .rows_affected();

        if inserted == 1 {
            return Ok(payload.to_string());
        }

        debug!("Terminal response already recorded, returning existing");
        self.terminal(correlation_id)
            .await?
            .ok_or_else(|| Error::NotFound(correlation_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn terminal(&self, correlation_id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT payload FROM terminal_responses WHERE correlation_id = ?1")
            .bind(correlation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|r| r.get("payload")))
    }

    #[instrument(skip(self, payload))]
    async fn save_review(&self, correlation_id: &str, payload: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO review_items (correlation_id, payload, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(correlation_id)
            DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
            "#,
        )
        .bind(correlation_id)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_review(&self, correlation_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM review_items WHERE correlation_id = ?1")
            .bind(correlation_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_reviews(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT payload FROM review_items ORDER BY created_at ASC, rowid ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.get("payload")).collect())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
