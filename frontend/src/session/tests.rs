use super::*;
use crate::web::MemoryStorage;
use clubhouse_shared::{CoachProfile, User};
use serde_json::json;
use std::sync::{Arc, Mutex};

const KEY: &str = "user-store";

// =========================================================
// 辅助函数
// =========================================================

fn member(id: u64, member_type: MemberType) -> User {
    User {
        id,
        name: format!("user-{}", id),
        email: format!("user{}@club.org", id),
        phone: Some("555-0101".to_string()),
        member_type,
        coach: None,
        consent_form_url: None,
    }
}

fn session(token: &str) -> Session {
    Session::new(token, member(1, MemberType::Member))
}

fn coach_session() -> Session {
    let mut user = member(9, MemberType::Coach);
    user.coach = Some(CoachProfile {
        coach_id: 4,
        contact_info: Some("field 2".to_string()),
        team_name: None,
    });
    Session::new("coach-token", user)
}

// =========================================================
// get / set
// =========================================================

#[test]
fn test_starts_absent_without_snapshot() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    assert_eq!(store.get(), None);
    assert!(!store.is_authenticated());
    assert_eq!(store.token(), None);
}

#[test]
fn test_get_returns_exactly_what_was_set() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    for s in [session("a"), coach_session(), session("b")] {
        store.set(Some(s.clone()));
        assert_eq!(store.get(), Some(s));
    }
    store.set(None);
    assert_eq!(store.get(), None);
}

#[test]
fn test_clones_share_state() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    let other = store.clone();
    store.set(Some(session("shared")));
    assert_eq!(other.token().as_deref(), Some("shared"));
    assert_eq!(other.member_type(), Some(MemberType::Member));
}

// =========================================================
// 持久化
// =========================================================

#[test]
fn test_every_set_writes_snapshot() {
    let storage = MemoryStorage::new();
    let store = SessionStore::restore(storage.clone(), KEY);
    store.set(Some(session("x")));
    store.set(None);
    assert_eq!(storage.write_count(), 2);
    assert_eq!(storage.raw(KEY).as_deref(), Some("null"));
}

#[test]
fn test_reload_restores_session() {
    let storage = MemoryStorage::new();
    let store = SessionStore::restore(storage.clone(), KEY);
    store.set(Some(coach_session()));

    let reloaded = SessionStore::restore(storage, KEY);
    assert_eq!(reloaded.get(), Some(coach_session()));
}

#[test]
fn test_blank_token_is_stored_as_absent() {
    let storage = MemoryStorage::new();
    let store = SessionStore::restore(storage.clone(), KEY);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |s| sink.lock().unwrap().push(s.is_some()));

    store.set(Some(session("x")));
    store.set(Some(session("   ")));

    let live = store.get();
    let reloaded = SessionStore::restore(storage.clone(), KEY).get();
    assert_eq!(live, None);
    assert_eq!(live, reloaded);
    assert_eq!(storage.raw(KEY).as_deref(), Some("null"));
    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_reload_after_logout_is_absent() {
    let storage = MemoryStorage::new();
    let store = SessionStore::restore(storage.clone(), KEY);
    store.set(Some(session("x")));
    store.set(None);

    let reloaded = SessionStore::restore(storage, KEY);
    assert_eq!(reloaded.get(), None);
}

#[test]
fn test_corrupt_snapshot_is_absent() {
    let store = SessionStore::restore(MemoryStorage::with_entry(KEY, "{not json"), KEY);
    assert_eq!(store.get(), None);
}

#[test]
fn test_partial_snapshot_is_absent() {
    let raw = json!({ "token": "tok123" }).to_string();
    let store = SessionStore::restore(MemoryStorage::with_entry(KEY, &raw), KEY);
    assert_eq!(store.get(), None);

    let raw = json!({ "user": member(1, MemberType::Player) }).to_string();
    let store = SessionStore::restore(MemoryStorage::with_entry(KEY, &raw), KEY);
    assert_eq!(store.get(), None);
}

#[test]
fn test_empty_token_snapshot_is_absent() {
    let raw = serde_json::to_string(&Some(session(""))).unwrap();
    let store = SessionStore::restore(MemoryStorage::with_entry(KEY, &raw), KEY);
    assert_eq!(store.get(), None);
}

#[test]
fn test_snapshot_under_other_key_is_ignored() {
    let raw = serde_json::to_string(&Some(session("x"))).unwrap();
    let store = SessionStore::restore(MemoryStorage::with_entry("other", &raw), KEY);
    assert_eq!(store.get(), None);
}

// =========================================================
// 订阅
// =========================================================

#[test]
fn test_subscribers_see_every_change() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |s| sink.lock().unwrap().push(s.map(|s| s.token.clone())));

    store.set(Some(session("one")));
    store.set(Some(session("two")));
    store.clear();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("one".to_string()), Some("two".to_string()), None]
    );
}

#[test]
fn test_subscriber_can_read_store_during_callback() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    let observed = Arc::new(Mutex::new(None));
    let (sink, reader) = (Arc::clone(&observed), store.clone());
    store.subscribe(move |_| *sink.lock().unwrap() = reader.token());

    store.set(Some(session("inside")));
    assert_eq!(observed.lock().unwrap().as_deref(), Some("inside"));
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let id = store.subscribe(move |_| *sink.lock().unwrap() += 1);

    store.set(Some(session("a")));
    store.unsubscribe(id);
    store.set(None);

    assert_eq!(*count.lock().unwrap(), 1);
}

// =========================================================
// 资料更新
// =========================================================

#[test]
fn test_update_user_keeps_token() {
    let storage = MemoryStorage::new();
    let store = SessionStore::restore(storage.clone(), KEY);
    store.set(Some(coach_session()));

    let updated = store
        .update_user(&json!({ "name": "Coach Carter", "consent_form_url": "https://files/cf.pdf" }))
        .unwrap();

    assert_eq!(updated.token, "coach-token");
    assert_eq!(updated.user.name, "Coach Carter");
    assert_eq!(updated.user.coach, coach_session().user.coach);
    assert_eq!(store.get(), Some(updated.clone()));
    assert_eq!(SessionStore::restore(storage, KEY).get(), Some(updated));
}

#[test]
fn test_update_user_without_session_fails() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    let result = store.update_user(&json!({ "name": "x" }));
    assert!(matches!(result, Err(SessionError::NotAuthenticated)));
    assert_eq!(store.get(), None);
}

#[test]
fn test_update_user_rejects_invalid_patch() {
    let store = SessionStore::restore(MemoryStorage::new(), KEY);
    store.set(Some(session("t")));
    let result = store.update_user(&json!({ "id": "not-a-number" }));
    assert!(matches!(result, Err(SessionError::InvalidProfile(_))));
    assert_eq!(store.get(), Some(session("t")));
}
