// ==========================
// crates/backend-lib/tests/session_cache.rs
// ==========================
use std::sync::Arc;
use std::time::Duration;

use authgate_backend_lib::auth::{
    AuthService, Authenticator, MemorySessionCache, SessionCache,
};
use authgate_backend_lib::config::Settings;
use authgate_backend_lib::store::MemoryUserStore;

fn service_with_cache() -> (MemorySessionCache, Authenticator) {
    let cache = MemorySessionCache::new();
    let auth = Authenticator::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(cache.clone()),
        Arc::new(Settings::default()),
    );
    (cache, auth)
}

#[tokio::test]
async fn test_serialize_deserialize_round_trip() {
    let (_, auth) = service_with_cache();

    auth.serialize_user("session-key", r#"{"id":"u1"}"#, 60)
        .await
        .unwrap();

    let payload = auth.deserialize_user("session-key").await.unwrap();
    assert_eq!(payload.as_deref(), Some(r#"{"id":"u1"}"#));
}

#[tokio::test]
async fn test_empty_payload_is_not_a_miss() {
    let (_, auth) = service_with_cache();

    auth.serialize_user("session-key", "", 60).await.unwrap();

    // an empty payload must stay distinguishable from an absent session
    let payload = auth.deserialize_user("session-key").await.unwrap();
    assert_eq!(payload.as_deref(), Some(""));
}

#[tokio::test]
async fn test_unknown_key_reads_as_none() {
    let (_, auth) = service_with_cache();

    let payload = auth.deserialize_user("never-written").await.unwrap();
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_expired_session_reads_as_none() {
    let (_, auth) = service_with_cache();

    auth.serialize_user("session-key", r#"{"id":"u1"}"#, 1)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    // never a stale payload after the TTL, even before the sweep runs
    let payload = auth.deserialize_user("session-key").await.unwrap();
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_overwrite_replaces_payload_and_ttl() {
    let (_, auth) = service_with_cache();

    auth.serialize_user("session-key", "first", 1).await.unwrap();
    auth.serialize_user("session-key", "second", 60)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    // the rewrite extended the entry's life and replaced its payload
    let payload = auth.deserialize_user("session-key").await.unwrap();
    assert_eq!(payload.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_remove_drops_entry() {
    let (cache, auth) = service_with_cache();

    auth.serialize_user("session-key", "payload", 60)
        .await
        .unwrap();
    cache.remove("session-key").await.unwrap();

    let payload = auth.deserialize_user("session-key").await.unwrap();
    assert!(payload.is_none());
}
