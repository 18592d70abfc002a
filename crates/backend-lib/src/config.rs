// ============================
// authgate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::auth::PasswordRequirements;

/// Supplies the password-hashing work factor.
///
/// Read at each call site rather than cached, so a rotated cost takes
/// effect on the next hash without a restart of in-flight callers.
pub trait HashCost: Send + Sync {
    /// Scrypt work factor as log2(N).
    fn cost_factor(&self) -> u8;
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Scrypt work factor (log2 of N)
    pub hash_cost_factor: u8,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
    /// Login throttling
    pub rate_limit: RateLimitSettings,
}

/// Login throttling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Failed attempts per IP before lockout
    pub max_attempts: u32,
    /// Lockout duration in seconds
    pub lockout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            hash_cost_factor: 15,
            password_requirements: PasswordRequirements::default(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Settings {
    /// Load settings from config files and environment variables,
    /// starting from the built-in defaults.
    pub fn load() -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("authgate.toml"))
            .merge(Yaml::file("authgate.yaml"))
            .merge(Json::file("authgate.json"))
            .merge(Env::prefixed("AUTHGATE_"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from an explicit TOML file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AUTHGATE_"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {},
            other => anyhow::bail!("unknown log level: {other}"),
        }

        if self.session_ttl_secs == 0 {
            anyhow::bail!("session_ttl_secs must be positive");
        }

        // below 10 is trivially brute-forceable, above 22 stalls logins
        if !(10..=22).contains(&self.hash_cost_factor) {
            anyhow::bail!(
                "hash_cost_factor {} outside supported range 10..=22",
                self.hash_cost_factor
            );
        }

        if self.password_requirements.min_length < crate::auth::MIN_PASSWORD_LENGTH {
            anyhow::bail!("password min_length below floor");
        }

        if self.rate_limit.max_attempts == 0 {
            anyhow::bail!("rate_limit.max_attempts must be positive");
        }

        Ok(())
    }
}

impl HashCost for Settings {
    fn cost_factor(&self) -> u8 {
        self.hash_cost_factor
    }
}
