// ============================
// authgate-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `AuthGate` authentication service.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthRateLimiter, AuthService, Authenticator, MemorySessionCache, SessionCache};
use crate::config::Settings;
use crate::store::{MemoryUserStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// User record store
    pub users: Arc<dyn UserStore>,
    /// Session cache
    pub sessions: Arc<dyn SessionCache>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Login rate limiter
    pub rate_limiter: AuthRateLimiter,
}

impl AppState {
    /// Create a new application state over the given ports.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionCache>,
        settings: Settings,
    ) -> Self {
        let settings = Arc::new(settings);
        let auth = Arc::new(Authenticator::new(
            users.clone(),
            sessions.clone(),
            settings.clone(),
        ));
        let rate_limiter = AuthRateLimiter::new(
            settings.rate_limit.max_attempts,
            Duration::from_secs(settings.rate_limit.lockout_secs),
        );

        Self {
            auth,
            users,
            sessions,
            settings,
            rate_limiter,
        }
    }

    /// Create a state wired to the in-memory store and cache.
    pub fn in_memory(settings: Settings) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionCache::new()),
            settings,
        )
    }
}
