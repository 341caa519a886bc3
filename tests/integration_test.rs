//! Integration tests for Floorgate
//!
//! These tests verify the integration between the crates:
//! - floorgate-llm: fixture provider and fallback generator
//! - floorgate-replay: SQLite audit store
//! - floorgate-core: engine, validation and review queue

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use floorgate_core::{
    Engine, EngineConfig, OrchestratorConfig, ReviewDecision, ReviewState, RuleSet,
    StaticRuleBook, ValidationStatus,
};
use floorgate_llm::{
    FixtureProvider, LayoutProposal, LayoutRequest, MeasurementSystem, Opening, Point, Room,
    RoomProgram, StripFallbackGenerator, Wall,
};
use floorgate_replay::{AuditEventType, AuditStore, SqliteAuditStore};
use tokio_test::assert_ok;

// ============================================================================
// Helpers
// ============================================================================

const MM_PER_INCH: f64 = 25.4;
const M2_PER_SQFT: f64 = 0.092_903_04;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// Bedroom beside an ensuite sharing its east wall, lengths divided by `scale`
fn ensuite_proposal(scale: f64) -> LayoutProposal {
    let s = |v: f64| v / scale;
    let bedroom = rect(0.0, 0.0, s(4000.0), s(3000.0));
    let bath = rect(s(4000.0), 0.0, s(6000.0), s(4000.0));

    (0..bedroom.len()).fold(
        LayoutProposal::new("recorded")
            .with_room(Room::new("r-bed", "Bedroom", bedroom.clone()))
            .with_room(Room::new("r-bath", "Bath", bath))
            .with_door(Opening::new("bed-door", "bed-0", 0.5, s(900.0), s(2100.0)))
            .with_confidence(0.95),
        |proposal, i| {
            proposal.with_wall(Wall::new(
                format!("bed-{i}"),
                bedroom[i],
                bedroom[(i + 1) % bedroom.len()],
                s(2700.0),
                s(150.0),
            ))
        },
    )
}

fn ensuite_request(id: &str) -> LayoutRequest {
    LayoutRequest::new("bedroom with ensuite", "test")
        .with_correlation_id(id)
        .with_room(RoomProgram::new("Bedroom", 12.0))
        .with_room(RoomProgram::new("Bath", 8.0).adjacent_to("Bedroom"))
}

fn write_fixture(dir: &Path, proposal: &LayoutProposal) -> std::path::PathBuf {
    let path = dir.join("proposal.json");
    std::fs::write(&path, serde_json::to_string_pretty(proposal).unwrap()).unwrap();
    path
}

fn config() -> EngineConfig {
    EngineConfig::new().with_orchestrator(
        OrchestratorConfig::default()
            .with_timeouts(Duration::from_millis(500), Duration::from_secs(2)),
    )
}

fn fixture_engine(store: Arc<dyn AuditStore>, fixture: &Path) -> Engine {
    Engine::new(
        &config(),
        Arc::new(StripFallbackGenerator::new()),
        Arc::new(StaticRuleBook::new([RuleSet::new("test").with_min_room_area(4.0)])),
        store,
    )
    .with_provider(Arc::new(FixtureProvider::new("recorded", fixture)))
}

async fn event_types(engine: &Engine, id: &str) -> Vec<AuditEventType> {
    engine
        .audit_trail(id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.event_type)
        .collect()
}

// ============================================================================
// Fixture provider through the whole pipeline
// ============================================================================

#[tokio::test]
async fn test_fixture_layout_survives_restart_and_review() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), &ensuite_proposal(1.0));
    let db = dir.path().join("audit.db");

    let first = {
        let store = Arc::new(SqliteAuditStore::from_path(&db).await.unwrap());
        let engine = fixture_engine(store, &fixture);
        assert_ok!(engine.submit(ensuite_request("it-1")).await)
    };
    assert_eq!(first.status, ValidationStatus::Valid);
    assert_eq!(first.proposal.provider, "recorded");
    assert!(first.requires_human_review);

    let store = Arc::new(SqliteAuditStore::from_path(&db).await.unwrap());
    let engine = fixture_engine(store, &fixture);
    assert_eq!(assert_ok!(engine.restore().await), 1);

    let replayed = assert_ok!(engine.submit(ensuite_request("it-1")).await);
    assert_eq!(
        serde_json::to_string(&replayed).unwrap(),
        serde_json::to_string(&first).unwrap()
    );

    assert_ok!(engine.claim_review("ana").await);
    let item = assert_ok!(
        engine
            .resolve_review("it-1", "ana", ReviewDecision::Approve, None)
            .await
    );
    assert_eq!(item.state, ReviewState::Approved);

    let trail = engine.audit_trail("it-1").await.unwrap();
    let sequence: Vec<i64> = trail.iter().map(|r| r.sequence_num).collect();
    assert_eq!(sequence, (1..=trail.len() as i64).collect::<Vec<_>>());
    assert_eq!(trail.first().unwrap().event_type, AuditEventType::Submitted);
    assert_eq!(trail.last().unwrap().event_type, AuditEventType::Resolved);
}

#[tokio::test]
async fn test_imperial_fixture_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), &ensuite_proposal(MM_PER_INCH));
    let store = Arc::new(SqliteAuditStore::in_memory().await.unwrap());
    let engine = fixture_engine(store, &fixture);

    let request = LayoutRequest::new("bedroom with ensuite", "test")
        .with_correlation_id("it-imperial")
        .with_measurement_system(MeasurementSystem::Imperial)
        .with_room(RoomProgram::new("Bedroom", 12.0 / M2_PER_SQFT))
        .with_room(RoomProgram::new("Bath", 8.0 / M2_PER_SQFT).adjacent_to("Bedroom"));

    let response = assert_ok!(engine.submit(request).await);

    assert_eq!(response.status, ValidationStatus::Valid);
    assert!(response.validation.errors.is_empty());
}

#[tokio::test]
async fn test_missing_fixture_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteAuditStore::in_memory().await.unwrap());
    let engine = fixture_engine(store, &dir.path().join("absent.json"));

    let response = assert_ok!(engine.submit(ensuite_request("it-fallback")).await);

    assert_eq!(response.status, ValidationStatus::RequiresManualReview);
    assert!(response.validation.used_fallback);
    assert!(response.requires_human_review);

    let events = event_types(&engine, "it-fallback").await;
    assert!(events.contains(&AuditEventType::ProviderFailed));
    assert!(events.contains(&AuditEventType::FallbackUsed));
    assert_eq!(events.last(), Some(&AuditEventType::Queued));
}
