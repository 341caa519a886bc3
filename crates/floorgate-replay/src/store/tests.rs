//! Tests for store module

use super::*;
use crate::event::{AuditEventType, AuditRecord};
use std::sync::Arc;
use tokio_test::assert_ok;

async fn exercise_trail(store: &dyn AuditStore) {
    let first = assert_ok!(
        store
            .append(AuditRecord::new("corr-1", AuditEventType::Submitted))
            .await
    );
    assert_eq!(first.sequence_num, 1);
    assert_ok!(
        store
            .append(
                AuditRecord::new("corr-1", AuditEventType::ProviderCalled)
                    .with_payload(serde_json::json!({ "provider": "primary" })),
            )
            .await
    );
    assert_ok!(
        store
            .append(AuditRecord::new("corr-2", AuditEventType::Submitted))
            .await
    );

    let trail = store.trail("corr-1").await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].sequence_num, 1);
    assert_eq!(trail[0].event_type, AuditEventType::Submitted);
    assert_eq!(trail[1].sequence_num, 2);
    assert_eq!(trail[1].payload["provider"], "primary");

    assert_eq!(store.trail("corr-2").await.unwrap().len(), 1);
    assert!(store.trail("unknown").await.unwrap().is_empty());
}

async fn exercise_terminal_first_writer_wins(store: &dyn AuditStore) {
    assert!(store.terminal("corr-1").await.unwrap().is_none());

    let first = store.insert_terminal("corr-1", r#"{"n":1}"#).await.unwrap();
    let second = store.insert_terminal("corr-1", r#"{"n":2}"#).await.unwrap();

    assert_eq!(first, r#"{"n":1}"#);
    assert_eq!(second, r#"{"n":1}"#);
    assert_eq!(
        store.terminal("corr-1").await.unwrap().as_deref(),
        Some(r#"{"n":1}"#)
    );
}

async fn exercise_reviews(store: &dyn AuditStore) {
    store.save_review("a", r#"{"state":"pending"}"#).await.unwrap();
    store.save_review("b", r#"{"state":"pending"}"#).await.unwrap();
    store.save_review("a", r#"{"state":"approved"}"#).await.unwrap();

    let reviews = store.load_reviews().await.unwrap();
    assert_eq!(
        reviews,
        vec![
            r#"{"state":"approved"}"#.to_string(),
            r#"{"state":"pending"}"#.to_string()
        ]
    );

    store.delete_review("a").await.unwrap();
    store.delete_review("missing").await.unwrap();
    store.save_review("c", r#"{"state":"in_review"}"#).await.unwrap();
    assert_eq!(
        store.load_reviews().await.unwrap(),
        vec![
            r#"{"state":"pending"}"#.to_string(),
            r#"{"state":"in_review"}"#.to_string()
        ]
    );
}

#[test]
fn test_default_data_dir() {
    let dir = default_data_dir();
    assert!(dir.to_string_lossy().contains("floorgate"));
    assert!(default_db_path().ends_with("floorgate.db"));
}

#[tokio::test]
async fn test_memory_store_trail() {
    exercise_trail(&MemoryAuditStore::new()).await;
}

#[tokio::test]
async fn test_memory_store_terminal() {
    exercise_terminal_first_writer_wins(&MemoryAuditStore::new()).await;
}

#[tokio::test]
async fn test_memory_store_reviews() {
    exercise_reviews(&MemoryAuditStore::new()).await;
}

#[tokio::test]
async fn test_sqlite_store_trail() {
    let store = SqliteAuditStore::in_memory().await.unwrap();
    assert_eq!(store.name(), "sqlite");
    exercise_trail(&store).await;
    assert_eq!(store.count_records("corr-1").await.unwrap(), 2);
}

#[tokio::test]
async fn test_sqlite_store_terminal() {
    exercise_terminal_first_writer_wins(&SqliteAuditStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn test_sqlite_store_reviews() {
    exercise_reviews(&SqliteAuditStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.db");

    {
        let store = SqliteAuditStore::from_path(&path).await.unwrap();
        store
            .append(AuditRecord::new("corr-9", AuditEventType::Submitted))
            .await
            .unwrap();
        store.insert_terminal("corr-9", "{}").await.unwrap();
    }

    let reopened = SqliteAuditStore::from_path(&path).await.unwrap();
    assert_eq!(reopened.trail("corr-9").await.unwrap().len(), 1);
    assert_eq!(reopened.terminal("corr-9").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_concurrent_appends_get_distinct_sequence_numbers() {
    let store = Arc::new(MemoryAuditStore::new());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append(AuditRecord::new("shared", AuditEventType::ProviderCalled))
                .await
                .unwrap()
                .sequence_num
        }));
    }

    let mut seqs = Vec::new();
    for handle in handles {
        seqs.push(handle.await.unwrap());
    }
    seqs.sort_unstable();
    assert_eq!(seqs, (1..=16).collect::<Vec<i64>>());
    assert_eq!(store.record_count().await, 16);
}
