// ==========================
// crates/backend-lib/tests/router.rs
// ==========================
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use authgate_backend_lib::{config::Settings, router::create_router, AppState};
use authgate_common::{LoginResponse, SessionUser};

fn test_router() -> Router {
    let mut settings = Settings::default();
    settings.hash_cost_factor = 10;
    settings.rate_limit.max_attempts = 2;
    create_router(Arc::new(AppState::in_memory(settings)))
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_login_session_logout_flow() {
    let app = test_router();

    // register
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered: SessionUser = body_json(response).await;

    // login
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse = body_json(response).await;
    assert_eq!(login.user.id, registered.id);
    assert!(!login.session_token.is_empty());

    // session introspection
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/session")
                .header("authorization", format!("Bearer {}", login.session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let principal: SessionUser = body_json(response).await;
    assert_eq!(principal.id, registered.id);

    // logout, then the session is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("authorization", format!("Bearer {}", login.session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/session")
                .header("authorization", format!("Bearer {}", login.session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"not-an-email","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"user@example.com","password":"weak"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_register_is_bad_request() {
    let app = test_router();

    let body = r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#;
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = test_router();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"user@example.com","password":"Wr0ng-password!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // unknown email gets the same status as a wrong password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"ghost@example.com","password":"Wr0ng-password!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_lockout_after_repeated_failures() {
    let app = test_router();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();

    let bad_login = || {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("content-type", "application/json")
            .header("x-real-ip", "203.0.113.9")
            .body(Body::from(
                r#"{"email":"user@example.com","password":"Wr0ng-password!"}"#,
            ))
            .unwrap()
    };

    // max_attempts is 2 in the test settings
    for _ in 0..2 {
        let response = app.clone().oneshot(bad_login()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app.clone().oneshot(bad_login()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // a different address is unaffected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"user@example.com","password":"Str0ng-enough!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_google_login_roundtrip() {
    let app = test_router();

    let body = r#"{"id":"provider-123","email":"fed@example.com"}"#;
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/google", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first: serde_json::Value = body_json(response).await;
    assert_eq!(first["googleId"], "provider-123");

    // repeat login resolves to the same link
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/google", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second: serde_json::Value = body_json(response).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_google_login_rejects_empty_assertion() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/google",
            r#"{"id":"","email":"fed@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_without_token_is_not_found() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
