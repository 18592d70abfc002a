// ==========================
// crates/backend-lib/tests/user_store.rs
// ==========================
use std::sync::Arc;

use authgate_backend_lib::error::AppError;
use authgate_backend_lib::store::{MemoryUserStore, UserStore};

#[tokio::test]
async fn test_create_and_find_local_user() {
    let store = MemoryUserStore::new();

    let created = store
        .create_user("user@example.com", "$scrypt$fake-hash")
        .await
        .unwrap();

    let id = store
        .find_user_by_email("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(id, created.id);

    let for_login = store
        .find_user_for_login("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(for_login.password_hash.as_deref(), Some("$scrypt$fake-hash"));
    assert!(for_login.google_id.is_none());
    assert!(for_login.deleted_at.is_none());

    // session lookup returns the sanitized view
    let for_session = store.find_user_for_session(&created.id).await.unwrap().unwrap();
    assert_eq!(for_session, created);
}

#[tokio::test]
async fn test_lookup_misses_are_explicit() {
    let store = MemoryUserStore::new();

    assert!(store
        .find_user_for_login("ghost@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(store.find_user_for_session("no-such-id").await.unwrap().is_none());
    assert!(store
        .find_user_by_email("ghost@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(store.find_user_by_google_id("no-link").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_insert_rejected() {
    let store = MemoryUserStore::new();

    store
        .create_user("user@example.com", "hash-one")
        .await
        .unwrap();
    let err = store
        .create_user("user@example.com", "hash-two")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmailAlreadyRegistered));

    // loser did not clobber the winner
    let record = store
        .find_user_for_login("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.password_hash.as_deref(), Some("hash-one"));
}

#[tokio::test]
async fn test_google_create_sets_no_password() {
    let store = MemoryUserStore::new();

    let created = store
        .create_google_user("provider-123", "fed@example.com")
        .await
        .unwrap();

    assert_eq!(created.google_id.as_deref(), Some("provider-123"));

    let found = store
        .find_user_by_google_id("provider-123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn test_google_create_race_resolves_to_one_record() {
    let store = Arc::new(MemoryUserStore::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .create_google_user("provider-123", "fed@example.com")
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    // every contender observed the same record
    ids.dedup();
    assert_eq!(ids.len(), 1);
}
