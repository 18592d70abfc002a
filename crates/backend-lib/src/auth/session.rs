// ============================
// authgate-backend-lib/src/auth/session.rs
// ============================
//! Session cache port and in-memory TTL implementation.
use async_trait::async_trait;
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};

/// Interval between expiry sweeps
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Key/value session store with per-entry expiration.
///
/// Values are opaque serialized principal payloads; the cache neither
/// inspects nor rewrites them. `get` must distinguish a missing or expired
/// entry (`None`) from a present empty payload (`Some("")`).
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Write `value` under `key`, overwriting any existing entry.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), AppError>;

    /// Read the payload stored under `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Drop the entry under `key`, if any. Used by logout, never by the
    /// core login path — sessions otherwise only lapse via their TTL.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory implementation of [`SessionCache`].
///
/// Entries are dropped lazily on read and swept periodically by a
/// background task. Must be constructed inside a tokio runtime.
#[derive(Clone)]
pub struct MemorySessionCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        let cache = MemorySessionCache {
            entries: Arc::new(DashMap::new()),
        };

        // Spawn the expiry sweep task
        let cache_clone = cache.clone();
        tokio::spawn(async move {
            cache_clone.sweep_task().await;
        });

        cache
    }

    /// Periodically remove expired entries so abandoned sessions do not
    /// accumulate between reads.
    async fn sweep_task(&self) {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;

            let now = Instant::now();
            let before_count = self.entries.len();

            self.entries.retain(|_, entry| now < entry.expires_at);

            let after_count = self.entries.len();
            let removed = before_count - after_count;

            if removed > 0 {
                counter!(SESSION_EXPIRED).increment(removed as u64);
                gauge!(SESSION_ACTIVE).set(after_count as f64);
            }
        }
    }
}

impl Default for MemorySessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), AppError> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        };
        self.entries.insert(key.to_string(), entry);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.entries.len() as f64);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        // expired entries must read as absent even before the sweep runs
        if let Some(entry) = self.entries.get(key) {
            if Instant::now() < entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
        }

        if self.entries.remove_if(key, |_, e| Instant::now() >= e.expires_at).is_some() {
            counter!(SESSION_EXPIRED).increment(1);
            gauge!(SESSION_ACTIVE).set(self.entries.len() as f64);
        }

        Ok(None)
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        gauge!(SESSION_ACTIVE).set(self.entries.len() as f64);
        Ok(())
    }
}
