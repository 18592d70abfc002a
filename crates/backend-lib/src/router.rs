// ============================
// authgate-backend-lib/src/router.rs
// ============================
//! HTTP router and request handlers.
//!
//! Thin transport wiring over the [`AuthService`] core: bodies in, typed
//! errors out. Session keys travel as bearer tokens; cookie handling is
//! left to upstream proxies.
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use authgate_common::{
    GoogleIdentity, GoogleLoginResponse, LoginRequest, LoginResponse, RegisterRequest, SessionUser,
};

use crate::auth::generate_session_key;
use crate::error::AppError;
use crate::validation;
use crate::AppState;

/// Create the authentication router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google", post(google_login))
        .route("/auth/session", get(session))
        .route("/auth/logout", post(logout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Best-effort client address for login throttling. Connections arrive
/// behind a proxy that sets `x-real-ip`; direct connections fall back to
/// loopback.
fn client_ip(headers: &HeaderMap) -> IpAddr {
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| IpAddr::from([127, 0, 0, 1]))
}

/// Bearer session key from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Handler for `POST /auth/register`
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_email(&body.email)?;
    validation::validate_password(&body.password, &state.settings.password_requirements)?;

    let user = state.auth.register(&body.email, body.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for `POST /auth/login`
async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ip = client_ip(&headers);
    if !state.rate_limiter.check_rate_limit(ip) {
        return Err(AppError::RateLimited);
    }

    let user = match state.auth.validate_user(&body.email, &body.password).await {
        Ok(user) => {
            state.rate_limiter.record_success(ip);
            user
        },
        Err(err) => {
            if matches!(err, AppError::InvalidCredentials) {
                state.rate_limiter.record_failed_attempt(ip);
            }
            return Err(err);
        },
    };

    // Mint an opaque session key and materialize the principal under it.
    // A cache failure here fails the login; no half-created session may
    // be handed out.
    let session_token = generate_session_key();
    let payload = serde_json::to_string(&user)?;
    state
        .auth
        .serialize_user(&session_token, &payload, state.settings.session_ttl_secs)
        .await?;

    debug!(user_id = %user.id, "session established");
    Ok(Json(LoginResponse {
        session_token,
        user,
    }))
}

/// Handler for `POST /auth/google`
///
/// The body is an already-verified federated assertion; code/token
/// exchange happens upstream.
async fn google_login(
    State(state): State<Arc<AppState>>,
    Json(identity): Json<GoogleIdentity>,
) -> Result<impl IntoResponse, AppError> {
    let google_id = state.auth.validate_google_user(&identity).await?;
    Ok(Json(GoogleLoginResponse { google_id }))
}

/// Handler for `GET /auth/session`
///
/// Dematerializes the caller's session and re-resolves the principal
/// against the user store, so a deleted account reads as no session.
async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(AppError::NotFound("session".to_string()));
    };

    let Some(payload) = state.auth.deserialize_user(token).await? else {
        return Err(AppError::NotFound("session".to_string()));
    };

    let principal: SessionUser = serde_json::from_str(&payload)?;
    let Some(user) = state.users.find_user_for_session(&principal.id).await? else {
        return Err(AppError::NotFound("session".to_string()));
    };

    Ok(Json(user))
}

/// Handler for `POST /auth/logout`
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.remove(token).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
