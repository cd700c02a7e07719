use std::sync::Arc;

use gatelink_core::{verify, CoreError, ScanOutcome, SessionContext};
use gatelink_roster::{PaxSource, RosterLedger};
use gatelink_session::SessionDirectory;
use gatelink_store::MemoryStore;

fn setup() -> (SessionDirectory, RosterLedger) {
    let store = Arc::new(MemoryStore::new());
    (
        SessionDirectory::new(store.clone()),
        RosterLedger::new(store),
    )
}

fn ctx(uid: &str) -> SessionContext {
    SessionContext::for_uid(uid)
}

#[tokio::test]
async fn test_roster_delivers_most_recent_first() {
    let (dir, ledger) = setup();
    let agent = ctx("uid-a");
    let handle = dir.create_session(&agent, "BA679").await.unwrap();

    for (name, seat) in [("Ada", "1A"), ("Ben", "2B"), ("Cleo", "3C")] {
        ledger
            .append_pax(&agent, &handle.session_id, name, seat, PaxSource::Manual)
            .await
            .unwrap();
    }

    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    let roster = feed.next().await.unwrap();
    let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cleo", "Ben", "Ada"]);
}

#[tokio::test]
async fn test_empty_name_or_seat_is_rejected_and_writes_nothing() {
    let (dir, ledger) = setup();
    let agent = ctx("uid-a");
    let handle = dir.create_session(&agent, "BA679").await.unwrap();

    let err = ledger
        .append_pax(&agent, &handle.session_id, "   ", "1A", PaxSource::Manual)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));

    let err = ledger
        .append_pax(&agent, &handle.session_id, "Ada", " ", PaxSource::Scan)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));

    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    assert_eq!(feed.next().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_seat_is_uppercased_and_source_preserved() {
    let (dir, ledger) = setup();
    let agent = ctx("uid-a");
    let handle = dir.create_session(&agent, "BA679").await.unwrap();

    ledger
        .append_pax(&agent, &handle.session_id, " Ada ", " 12a ", PaxSource::Scan)
        .await
        .unwrap();

    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    let roster = feed.next().await.unwrap();
    assert_eq!(roster[0].name, "Ada");
    assert_eq!(roster[0].seat, "12A");
    assert_eq!(roster[0].source, PaxSource::Scan);
    assert_eq!(roster[0].boarded_by, "uid-a");
}

#[tokio::test]
async fn test_all_participants_see_appends_live() {
    let (dir, ledger) = setup();
    let owner = ctx("uid-a");
    let joiner = ctx("uid-b");

    let handle = dir.create_session(&owner, "BA679").await.unwrap();
    dir.join_session(&joiner, "ba0679").await.unwrap();

    // The joiner starts watching before the owner boards anyone.
    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    assert_eq!(feed.next().await.unwrap().len(), 0);

    ledger
        .append_pax(&owner, &handle.session_id, "Ada", "1A", PaxSource::Manual)
        .await
        .unwrap();
    let roster = feed.next().await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].boarded_by, "uid-a");
}

#[tokio::test]
async fn test_scan_gate_feeds_the_same_append() {
    let (dir, ledger) = setup();
    let agent = ctx("uid-a");
    let handle = dir.create_session(&agent, "BA679").await.unwrap();

    // Scan-confirmed boarding: gate first, then the same append as manual.
    match verify("ba 0679", &handle.flight_code) {
        ScanOutcome::Match => {
            ledger
                .append_pax(&agent, &handle.session_id, "Ada", "1A", PaxSource::Scan)
                .await
                .unwrap();
        }
        other => panic!("expected a match, got {:?}", other),
    }

    assert_eq!(
        verify("LH100", &handle.flight_code),
        ScanOutcome::Mismatch {
            scanned: "LH100".to_string(),
            expected: "BA679".to_string(),
        }
    );
    assert_eq!(verify("", &handle.flight_code), ScanOutcome::Empty);

    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    let roster = feed.next().await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].source, PaxSource::Scan);
}

#[tokio::test]
async fn test_roster_window_caps_at_configured_size() {
    let store = Arc::new(MemoryStore::new());
    let dir = SessionDirectory::new(store.clone());
    let feeds = gatelink_store::app_config::FeedConfig {
        session_window: 20,
        roster_window: 2,
    };
    let ledger = RosterLedger::with_config(store, &feeds);

    let agent = ctx("uid-a");
    let handle = dir.create_session(&agent, "BA679").await.unwrap();
    for (name, seat) in [("Ada", "1A"), ("Ben", "2B"), ("Cleo", "3C")] {
        ledger
            .append_pax(&agent, &handle.session_id, name, seat, PaxSource::Manual)
            .await
            .unwrap();
    }

    let mut feed = ledger.watch_roster(&handle.session_id).await.unwrap();
    let roster = feed.next().await.unwrap();
    let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cleo", "Ben"]);
}
