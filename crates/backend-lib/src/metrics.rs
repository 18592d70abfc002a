// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const LOGIN_OK: &str = "auth.login.ok";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const USER_REGISTERED: &str = "auth.user.registered";
pub const GOOGLE_LOGIN: &str = "auth.google.login";
pub const GOOGLE_USER_CREATED: &str = "auth.google.created";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
