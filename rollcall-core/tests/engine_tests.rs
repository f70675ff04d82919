//! Integration tests for the recording engine
//!
//! Tests cover:
//! - Submission fields landing on the persisted row
//! - Duplicate handling (prior mark, fingerprint collision, attribution)
//! - Unknown identifiers leaving the table untouched
//! - Recent-activity feed ordering and bounding
//! - Concurrent submissions (no lost update)

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rollcall_core::table::RecordTable;
use rollcall_core::{roster, RecordOutcome, RecordingEngine, Submission};
use tempfile::TempDir;

/// Test helper: write a roster and bootstrap the record table
fn setup_table(dir: &TempDir, rows: &[(&str, &str)]) -> PathBuf {
    let roster_path = dir.path().join("input.csv");
    let table_path = dir.path().join("output.csv");

    let mut contents = String::from("Student ID,Student Name\n");
    for (id, name) in rows {
        contents.push_str(&format!("{id},{name}\n"));
    }
    fs::write(&roster_path, contents).unwrap();

    roster::ensure_record_table(&roster_path, &table_path).unwrap();
    table_path
}

fn submission(id: &str, time: &str, origin: &str, signature: &str) -> Submission {
    Submission {
        identifier: id.to_string(),
        timestamp: time.to_string(),
        origin_address: origin.to_string(),
        client_signature: signature.to_string(),
    }
}

// =============================================================================
// Fresh recording
// =============================================================================

#[tokio::test]
async fn test_record_persists_submission_fields() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice"), ("S2", "Bob")]);
    let engine = RecordingEngine::new(&table_path);

    let outcome = engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await
        .unwrap();
    assert_eq!(outcome, RecordOutcome::Recorded);

    let table = RecordTable::load(&table_path).unwrap();
    let row = table.find_by_identifier("S1").unwrap();
    let record = table.record(row);
    assert_eq!(record.marker, "X");
    assert_eq!(record.submit_time, "2025-03-01 09:00:00");
    assert_eq!(record.origin_address, "1.1.1.1");
    assert_eq!(record.client_signature, "agent-a");
}

// =============================================================================
// Duplicate handling
// =============================================================================

#[tokio::test]
async fn test_second_submission_is_duplicate_and_marker_never_reverts() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice")]);
    let engine = RecordingEngine::new(&table_path);

    let first = engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await
        .unwrap();
    assert_eq!(first, RecordOutcome::Recorded);

    // Different origin and signature: no fingerprint collision, but the
    // prior mark still flags the resubmission
    let second = engine
        .record(submission("S1", "2025-03-01 09:05:00", "2.2.2.2", "agent-b"))
        .await
        .unwrap();
    assert_eq!(second, RecordOutcome::Duplicate);

    let table = RecordTable::load(&table_path).unwrap();
    let record = table.record(table.find_by_identifier("S1").unwrap());
    assert_eq!(record.marker, "Duplicate submission");
    // The stored fingerprint reflects the most recent attempt
    assert_eq!(record.origin_address, "2.2.2.2");
    assert_eq!(record.client_signature, "agent-b");

    // A third attempt stays flagged; the marker never reverts to fresh
    let third = engine
        .record(submission("S1", "2025-03-01 09:10:00", "3.3.3.3", "agent-c"))
        .await
        .unwrap();
    assert_eq!(third, RecordOutcome::Duplicate);
    let table = RecordTable::load(&table_path).unwrap();
    assert_ne!(table.record(0).marker, "X");
}

#[tokio::test]
async fn test_fingerprint_collision_is_attributed() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice"), ("S2", "Bob")]);
    let engine = RecordingEngine::new(&table_path);

    engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await
        .unwrap();

    // B checks in from the device/network A already used
    let outcome = engine
        .record(submission("S2", "2025-03-01 09:01:00", "1.1.1.1", "agent-b"))
        .await
        .unwrap();
    assert_eq!(outcome, RecordOutcome::Duplicate);

    let table = RecordTable::load(&table_path).unwrap();
    let record = table.record(table.find_by_identifier("S2").unwrap());
    assert_eq!(record.marker, "Duplicated with S1");
}

#[tokio::test]
async fn test_scenario_two_subjects_shared_origin() {
    // roster = [S1 Alice, S2 Bob]; S1 records fresh, S2 collides on ip
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice"), ("S2", "Bob")]);
    let engine = RecordingEngine::new(&table_path);

    let first = engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "A"))
        .await
        .unwrap();
    assert_eq!(first, RecordOutcome::Recorded);
    let table = RecordTable::load(&table_path).unwrap();
    assert_eq!(table.record(0).marker, "X");

    let second = engine
        .record(submission("S2", "2025-03-01 09:02:00", "1.1.1.1", "B"))
        .await
        .unwrap();
    assert_eq!(second, RecordOutcome::Duplicate);
    let table = RecordTable::load(&table_path).unwrap();
    assert_eq!(table.record(1).marker, "Duplicated with S1");
}

// =============================================================================
// Unknown identifier
// =============================================================================

#[tokio::test]
async fn test_unknown_identifier_leaves_table_unchanged() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice")]);
    let engine = RecordingEngine::new(&table_path);

    let before = fs::read(&table_path).unwrap();
    let outcome = engine
        .record(submission("no-such-id", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await
        .unwrap();

    assert_eq!(outcome, RecordOutcome::SubjectNotFound);
    assert_eq!(fs::read(&table_path).unwrap(), before);
    assert!(engine.recent_activity().await.is_empty());
}

// =============================================================================
// Recent-activity feed
// =============================================================================

#[tokio::test]
async fn test_feed_is_bounded_and_newest_first() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<(String, String)> = (1..=15)
        .map(|i| (format!("S{i}"), format!("Subject {i}")))
        .collect();
    let refs: Vec<(&str, &str)> = rows
        .iter()
        .map(|(id, name)| (id.as_str(), name.as_str()))
        .collect();
    let table_path = setup_table(&dir, &refs);
    let engine = RecordingEngine::new(&table_path);

    // 15 fresh check-ins with distinct, non-colliding fingerprints
    for i in 1..=15 {
        let outcome = engine
            .record(submission(
                &format!("S{i}"),
                &format!("2025-03-01 09:{i:02}:00"),
                &format!("10.0.0.{i}"),
                &format!("agent-{i}"),
            ))
            .await
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Recorded);
    }

    let feed = engine.recent_activity().await;
    assert_eq!(feed.len(), 10);

    // Newest first: S15 down to S6
    for (pos, entry) in feed.iter().enumerate() {
        assert_eq!(entry.identifier, format!("S{}", 15 - pos));
    }
}

#[tokio::test]
async fn test_duplicates_do_not_enter_feed() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice"), ("S2", "Bob")]);
    let engine = RecordingEngine::new(&table_path);

    engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await
        .unwrap();
    engine
        .record(submission("S2", "2025-03-01 09:01:00", "1.1.1.1", "agent-b"))
        .await
        .unwrap();

    let feed = engine.recent_activity().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].identifier, "S1");
    assert_eq!(feed[0].display_name, "Alice");
    assert_eq!(feed[0].submit_time, "2025-03-01 09:00:00");
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_submissions_no_lost_update() {
    let dir = TempDir::new().unwrap();
    let table_path = setup_table(&dir, &[("S1", "Alice"), ("S2", "Bob")]);
    let engine = Arc::new(RecordingEngine::new(&table_path));

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
                .await
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .record(submission("S2", "2025-03-01 09:00:00", "2.2.2.2", "agent-b"))
                .await
        })
    };

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert_eq!(a, RecordOutcome::Recorded);
    assert_eq!(b, RecordOutcome::Recorded);

    // Both writes survived: no lost update
    let table = RecordTable::load(&table_path).unwrap();
    assert_eq!(table.record(table.find_by_identifier("S1").unwrap()).marker, "X");
    assert_eq!(table.record(table.find_by_identifier("S2").unwrap()).marker, "X");
    assert_eq!(engine.recent_activity().await.len(), 2);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_record_without_table_is_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let engine = RecordingEngine::new(dir.path().join("missing.csv"));

    let result = engine
        .record(submission("S1", "2025-03-01 09:00:00", "1.1.1.1", "agent-a"))
        .await;
    assert!(matches!(
        result,
        Err(rollcall_core::Error::StoreUnavailable(_))
    ));
}
