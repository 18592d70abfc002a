// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the `AuthGate` service core and its callers.
//! This module defines the user records, the sanitized principal view
//! stored in sessions, and the request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record as the store keeps it, password hash included.
///
/// The hash never leaves the store/auth boundary; everything that crosses
/// it is first reduced to a [`SessionUser`].
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque unique identifier (UUIDv4)
    pub id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, if the record was ever updated
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
    /// Login email, unique and case-sensitive as stored
    pub email: String,
    /// Scrypt PHC hash string; `None` for purely federated accounts
    pub password_hash: Option<String>,
    /// Federated provider id; `None` for purely local accounts
    pub google_id: Option<String>,
}

impl UserRecord {
    /// Build a record for a locally registered account.
    pub fn new_local(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        UserRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
            email: email.into(),
            password_hash: Some(password_hash.into()),
            google_id: None,
        }
    }

    /// Build a record linked to a federated identity, with no local password.
    pub fn new_google(google_id: impl Into<String>, email: impl Into<String>) -> Self {
        UserRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
            email: email.into(),
            password_hash: None,
            google_id: Some(google_id.into()),
        }
    }

    /// Strip the password hash for use outside the store/auth boundary.
    pub fn sanitized(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            email: self.email.clone(),
            google_id: self.google_id.clone(),
        }
    }
}

/// Sanitized user view returned by login and stored as the session payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub email: String,
    pub google_id: Option<String>,
}

/// An already-authenticated federated identity assertion.
///
/// Verification of the upstream OAuth exchange happens before this type is
/// constructed; the service only links or creates the matching account.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoogleIdentity {
    /// Provider-issued user id
    pub id: String,
    /// Email reported by the provider
    pub email: String,
}

/// Body of `POST /auth/register`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque session key; callers present it as a bearer token
    pub session_token: String,
    pub user: SessionUser,
}

/// Response to a successful federated login
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginResponse {
    pub google_id: String,
}
