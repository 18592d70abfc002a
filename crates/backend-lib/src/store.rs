// ============================
// authgate-backend-lib/src/store.rs
// ============================
//! User store abstraction with in-memory implementation.
use async_trait::async_trait;
use authgate_common::{SessionUser, UserRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::AppError;

/// Trait for user record stores.
///
/// Lookups return `Option` so a miss is an explicit outcome, never an
/// error. Mutations enforce uniqueness atomically: callers must not
/// pre-check and insert in two steps, the store is the only place a
/// create/create race can be decided.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email for credential verification.
    /// The returned record includes the password hash.
    async fn find_user_for_login(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look up a sanitized user by internal id, for resolving a cached
    /// session principal back to a live record.
    async fn find_user_for_session(&self, user_id: &str) -> Result<Option<SessionUser>, AppError>;

    /// Look up just the id of the user registered under `email`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<String>, AppError>;

    /// Look up a sanitized user by federated provider id.
    async fn find_user_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<SessionUser>, AppError>;

    /// Insert a locally registered user. Fails with
    /// [`AppError::EmailAlreadyRegistered`] if the email is taken.
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<SessionUser, AppError>;

    /// Insert a user linked to a federated identity, with no password.
    /// If the provider id is already linked, returns the existing record:
    /// a lost create/create race resolves to the winner's record.
    async fn create_google_user(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<SessionUser, AppError>;
}

/// In-memory implementation of the [`UserStore`] trait.
///
/// Email and provider-id uniqueness are enforced through index maps whose
/// entry locks make each insert atomic.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
    email_index: Arc<DashMap<String, String>>,
    google_index: Arc<DashMap<String, String>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user_for_login(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let Some(id) = self.email_index.get(email) else {
            return Ok(None);
        };
        Ok(self.users.get(id.value()).map(|u| u.value().clone()))
    }

    async fn find_user_for_session(&self, user_id: &str) -> Result<Option<SessionUser>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.value().sanitized()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<String>, AppError> {
        Ok(self.email_index.get(email).map(|id| id.value().clone()))
    }

    async fn find_user_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<SessionUser>, AppError> {
        let Some(id) = self.google_index.get(google_id) else {
            return Ok(None);
        };
        Ok(self.users.get(id.value()).map(|u| u.value().sanitized()))
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<SessionUser, AppError> {
        // The entry guard holds the index shard lock, so the duplicate
        // check and the insert are one atomic step.
        match self.email_index.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AppError::EmailAlreadyRegistered),
            Entry::Vacant(slot) => {
                let record = UserRecord::new_local(email, password_hash);
                let sanitized = record.sanitized();
                self.users.insert(record.id.clone(), record.clone());
                slot.insert(record.id);
                Ok(sanitized)
            },
        }
    }

    async fn create_google_user(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<SessionUser, AppError> {
        match self.google_index.entry(google_id.to_string()) {
            Entry::Occupied(existing) => {
                // lost the race: hand back the already-linked record
                self.users
                    .get(existing.get())
                    .map(|u| u.value().sanitized())
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "google index points at missing user {}",
                            existing.get()
                        ))
                    })
            },
            Entry::Vacant(slot) => {
                let record = UserRecord::new_google(google_id, email);
                let sanitized = record.sanitized();
                self.users.insert(record.id.clone(), record.clone());
                slot.insert(record.id);
                Ok(sanitized)
            },
        }
    }
}
