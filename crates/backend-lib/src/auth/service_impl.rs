use std::sync::Arc;

use async_trait::async_trait;
use authgate_common::{GoogleIdentity, SessionUser};
use metrics::counter;
use tracing::{debug, warn};

use crate::auth::{password, AuthService, SessionCache};
use crate::config::HashCost;
use crate::error::AppError;
use crate::metrics::{GOOGLE_LOGIN, GOOGLE_USER_CREATED, LOGIN_FAILED, LOGIN_OK, USER_REGISTERED};
use crate::store::UserStore;

/// The authentication orchestrator.
///
/// Stateless coordinator over the injected ports; a single instance is
/// shared across all request handlers and is safe for unbounded
/// concurrent use.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionCache>,
    config: Arc<dyn HashCost>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionCache>,
        config: Arc<dyn HashCost>,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn validate_user(&self, email: &str, password: &str) -> Result<SessionUser, AppError> {
        let Some(user) = self.users.find_user_for_login(email).await? else {
            // same error as a wrong password, so responses cannot be used
            // to probe which emails are registered
            counter!(LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        // federated-only accounts carry no hash and cannot password-login
        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| password::verify_password(hash, password));

        if !verified {
            counter!(LOGIN_FAILED).increment(1);
            warn!(email, "credential verification failed");
            return Err(AppError::InvalidCredentials);
        }

        counter!(LOGIN_OK).increment(1);
        debug!(user_id = %user.id, "credentials verified");
        Ok(user.sanitized())
    }

    async fn serialize_user(
        &self,
        session_key: &str,
        payload: &str,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        // surfaced to the caller on failure, never retried here
        self.sessions.set(session_key, payload, ttl_secs).await
    }

    async fn deserialize_user(&self, session_key: &str) -> Result<Option<String>, AppError> {
        self.sessions.get(session_key).await
    }

    async fn register(&self, email: &str, mut password: String) -> Result<SessionUser, AppError> {
        // Cost is read per call so a rotated work factor applies from the
        // next registration on. Hashing before the uniqueness check costs
        // CPU on the duplicate path but keeps the insert a single atomic
        // step at the store.
        let cost = self.config.cost_factor();
        let hash = password::hash_password_secure(&mut password, cost)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = self.users.create_user(email, &hash).await.map_err(|e| {
            match e {
                AppError::EmailAlreadyRegistered => e,
                AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                    warn!(email, "user persistence failed");
                    AppError::UserCreationFailed
                },
                other => other,
            }
        })?;

        counter!(USER_REGISTERED).increment(1);
        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn validate_google_user(&self, identity: &GoogleIdentity) -> Result<String, AppError> {
        if identity.id.trim().is_empty() || identity.email.trim().is_empty() {
            return Err(AppError::InvalidFederatedAssertion);
        }

        counter!(GOOGLE_LOGIN).increment(1);

        // find-or-create keyed on the provider id, not the email; repeat
        // logins do not refresh the stored email
        if let Some(existing) = self.users.find_user_by_google_id(&identity.id).await? {
            return existing.google_id.ok_or_else(|| {
                AppError::Internal(format!("user {} lost its google link", existing.id))
            });
        }

        let created = self
            .users
            .create_google_user(&identity.id, &identity.email)
            .await
            .map_err(|e| match e {
                AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                    warn!(google_id = %identity.id, "federated user persistence failed");
                    AppError::UserCreationFailed
                },
                other => other,
            })?;

        counter!(GOOGLE_USER_CREATED).increment(1);
        debug!(user_id = %created.id, "federated user linked");
        created.google_id.ok_or_else(|| {
            AppError::Internal(format!("user {} created without google link", created.id))
        })
    }
}
