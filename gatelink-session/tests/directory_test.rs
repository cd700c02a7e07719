use std::sync::Arc;

use gatelink_core::{CoreError, SessionContext};
use gatelink_session::SessionDirectory;
use gatelink_store::MemoryStore;

fn directory() -> (SessionDirectory, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (SessionDirectory::new(store.clone()), store)
}

fn ctx(uid: &str) -> SessionContext {
    SessionContext::for_uid(uid)
}

#[tokio::test]
async fn test_create_then_join_resolves_same_session() {
    let (dir, _store) = directory();

    let created = dir.create_session(&ctx("uid-a"), "TK1234").await.unwrap();
    // Different spelling of the same flight lands in the same session.
    let joined = dir.join_session(&ctx("uid-b"), "tk01234").await.unwrap();

    assert_eq!(created.session_id, joined.session_id);
    assert_eq!(created.flight_code, joined.flight_code);
    assert_eq!(created.flight_code.as_str(), "TK1234");

    let mut feed = dir.my_sessions(&ctx("uid-b")).await.unwrap();
    let sessions = feed.next().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].members, vec!["uid-a", "uid-b"]);
    assert_eq!(sessions[0].owner_uid, "uid-a");
    assert!(sessions[0].active);
}

#[tokio::test]
async fn test_concurrent_joins_both_land_in_members() {
    let (dir, _store) = directory();
    let created = dir.create_session(&ctx("uid-a"), "BA679").await.unwrap();

    let ctx_b = ctx("uid-b");
    let ctx_c = ctx("uid-c");
    let (b, c) = tokio::join!(
        dir.join_session(&ctx_b, "BA679"),
        dir.join_session(&ctx_c, "ba0679"),
    );
    let b = b.unwrap();
    let c = c.unwrap();
    assert_eq!(b.session_id, created.session_id);
    assert_eq!(c.session_id, created.session_id);

    let mut feed = dir.my_sessions(&ctx("uid-a")).await.unwrap();
    let sessions = feed.next().await.unwrap();
    let mut members = sessions[0].members.clone();
    members.sort();
    assert_eq!(members, vec!["uid-a", "uid-b", "uid-c"]);
}

#[tokio::test]
async fn test_rejoining_is_a_no_op() {
    let (dir, _store) = directory();
    dir.create_session(&ctx("uid-a"), "BA679").await.unwrap();
    dir.join_session(&ctx("uid-b"), "BA679").await.unwrap();
    dir.join_session(&ctx("uid-b"), "BA679").await.unwrap();

    let mut feed = dir.my_sessions(&ctx("uid-b")).await.unwrap();
    let sessions = feed.next().await.unwrap();
    assert_eq!(sessions[0].members, vec!["uid-a", "uid-b"]);
}

#[tokio::test]
async fn test_join_without_candidate_fails() {
    let (dir, _store) = directory();
    let err = dir.join_session(&ctx("uid-c"), "ZZ9999").await.unwrap_err();
    assert!(matches!(err, CoreError::NoActiveSession(code) if code == "ZZ9999"));
}

#[tokio::test]
async fn test_empty_code_is_rejected_on_create_and_join() {
    let (dir, _store) = directory();
    assert!(matches!(
        dir.create_session(&ctx("uid-a"), "  #@! ").await,
        Err(CoreError::InvalidCode)
    ));
    assert!(matches!(
        dir.join_session(&ctx("uid-a"), "").await,
        Err(CoreError::InvalidCode)
    ));
}

#[tokio::test]
async fn test_join_targets_newest_active_session() {
    let (dir, _store) = directory();
    let older = dir.create_session(&ctx("uid-a"), "BA679").await.unwrap();
    let newer = dir.create_session(&ctx("uid-b"), "BA679").await.unwrap();
    assert_ne!(older.session_id, newer.session_id);

    let joined = dir.join_session(&ctx("uid-c"), "BA679").await.unwrap();
    assert_eq!(joined.session_id, newer.session_id);
}

#[tokio::test]
async fn test_my_sessions_redelivers_on_membership_change() {
    let (dir, _store) = directory();
    let mut feed = dir.my_sessions(&ctx("uid-b")).await.unwrap();
    assert_eq!(feed.next().await.unwrap().len(), 0);

    // uid-b is not in this session yet: the change triggers a redelivery,
    // still with an empty result set.
    dir.create_session(&ctx("uid-a"), "BA679").await.unwrap();
    assert_eq!(feed.next().await.unwrap().len(), 0);

    dir.join_session(&ctx("uid-b"), "BA679").await.unwrap();
    let sessions = feed.next().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].members.contains(&"uid-b".to_string()));
}
