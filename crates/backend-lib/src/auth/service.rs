use async_trait::async_trait;
use authgate_common::{GoogleIdentity, SessionUser};

use crate::error::AppError;

/// The authentication orchestration contract.
///
/// Implementations own no state of their own; every operation is a short
/// sequence of calls against the injected store, cache and config ports.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify an email/password credential pair.
    async fn validate_user(&self, email: &str, password: &str)
        -> Result<SessionUser, AppError>;

    /// Persist a serialized principal payload under `session_key`.
    async fn serialize_user(
        &self,
        session_key: &str,
        payload: &str,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Fetch the payload stored under `session_key`; `None` when the
    /// session is unknown or expired.
    async fn deserialize_user(&self, session_key: &str) -> Result<Option<String>, AppError>;

    /// Create a local account. Takes the password by value so the
    /// plaintext can be zeroized after hashing.
    async fn register(&self, email: &str, password: String) -> Result<SessionUser, AppError>;

    /// Link-or-create for an already-authenticated federated identity;
    /// returns the (possibly pre-existing) linked google id.
    async fn validate_google_user(&self, identity: &GoogleIdentity) -> Result<String, AppError>;
}
