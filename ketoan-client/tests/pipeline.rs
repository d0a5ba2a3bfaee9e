// ketoan-client/tests/pipeline.rs
// Authenticated request pipeline against a mock backend

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{auth_json, auth_response, bearer, client_for, init_tracing, spawn_backend};
use ketoan_client::{ApiRequest, ClientConfig, ClientError, HttpClient, SessionEvent, SessionStore};
use parking_lot::Mutex;
use serde_json::{Value, json};

#[derive(Clone, Copy)]
enum RefreshMode {
    Issue,
    Reject,
    NoToken,
}

struct Backend {
    refresh: RefreshMode,
    /// Only this bearer value is accepted by `/admin/users`
    valid: &'static str,
    hits: AtomicUsize,
    refresh_hits: AtomicUsize,
    seen: Mutex<Vec<Option<String>>>,
}

impl Backend {
    fn new(refresh: RefreshMode, valid: &'static str) -> Arc<Self> {
        Arc::new(Self {
            refresh,
            valid,
            hits: AtomicUsize::new(0),
            refresh_hits: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "jwt expired"}))).into_response()
}

async fn users(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    let auth = bearer(&headers);
    backend.seen.lock().push(auth.clone());
    if auth.as_deref() == Some(backend.valid) {
        Json(json!({"success": true, "data": []})).into_response()
    } else {
        unauthorized()
    }
}

async fn forbidden(State(backend): State<Arc<Backend>>) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::FORBIDDEN, Json(json!({"message": "admin only"}))).into_response()
}

// `Json` rejects a refresh without a JSON body
async fn refresh(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.refresh_hits.fetch_add(1, Ordering::SeqCst);
    // The refresh call never carries the bearer token
    assert!(bearer(&headers).is_none());
    assert_eq!(body, json!({}));
    match backend.refresh {
        RefreshMode::Issue => Json(json!({"accessToken": "fresh"})).into_response(),
        RefreshMode::NoToken => Json(json!({})).into_response(),
        RefreshMode::Reject => unauthorized(),
    }
}

async fn spawn(backend: Arc<Backend>) -> String {
    init_tracing();
    let router = Router::new()
        .route("/api/admin/users", get(users))
        .route("/api/admin/forbidden", get(forbidden))
        .route("/api/auth/refresh", post(refresh))
        .with_state(backend);
    spawn_backend(router).await
}

#[tokio::test]
async fn expired_token_is_refreshed_and_retried_once() {
    let backend = Backend::new(RefreshMode::Issue, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("stale")).unwrap();
    let mut events = session.subscribe();

    let body: Value = client.get("/admin/users").await.unwrap();
    assert_eq!(body["success"], true);

    assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        *backend.seen.lock(),
        vec![Some("Bearer stale".to_string()), Some("Bearer fresh".to_string())]
    );
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
    assert_eq!(session.user().unwrap().email, "admin@ketoan.vn");
    assert_eq!(events.try_recv().unwrap(), SessionEvent::TokenRefreshed);
}

#[tokio::test]
async fn failed_refresh_clears_session_and_announces_login() {
    let backend = Backend::new(RefreshMode::Reject, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("stale")).unwrap();
    let mut events = session.subscribe();

    let err = client.get::<Value>("/admin/users").await.unwrap_err();
    assert!(matches!(err, ClientError::SessionTerminated(_)), "got {err:?}");
    assert!(err.is_auth_failure());

    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
    assert!(session.access_token().is_none());
    assert!(session.user().is_none());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Terminated {
            redirect_to: "/auth".into()
        }
    );
}

#[tokio::test]
async fn forbidden_is_never_retried() {
    let backend = Backend::new(RefreshMode::Issue, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("fresh")).unwrap();

    let err = client.get::<Value>("/admin/forbidden").await.unwrap_err();
    match err {
        ClientError::Forbidden(message) => assert_eq!(message, "admin only"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 0);
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn second_unauthorized_is_returned_without_looping() {
    // Refresh succeeds, but the endpoint rejects every token
    let backend = Backend::new(RefreshMode::Issue, "Bearer never");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("stale")).unwrap();

    let err = client.get::<Value>("/admin/users").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)), "got {err:?}");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 1);
    // The refreshed token stays; only a failed refresh ends the session
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn refresh_without_token_keeps_original_error() {
    let backend = Backend::new(RefreshMode::NoToken, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("stale")).unwrap();

    let err = client.get::<Value>("/admin/users").await.unwrap_err();
    match err {
        ClientError::Unauthorized(message) => assert_eq!(message, "jwt expired"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
    assert_eq!(session.access_token().as_deref(), Some("stale"));
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let backend = Backend::new(RefreshMode::Reject, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    assert!(!session.is_authenticated());

    let _ = client.get::<Value>("/admin/users").await;
    assert_eq!(backend.seen.lock().first().cloned(), Some(None));
}

#[tokio::test]
async fn concurrent_requests_keep_separate_retry_state() {
    let backend = Backend::new(RefreshMode::Issue, "Bearer fresh");
    let (client, session) = client_for(&spawn(backend.clone()).await);
    session.establish(&auth_response("stale")).unwrap();

    let results =
        futures::future::join_all((0..3).map(|_| client.get::<Value>("/admin/users"))).await;
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
}

// ============================================================================
// Refresh cookie
// ============================================================================

async fn login_with_cookie() -> Response {
    (
        [(header::SET_COOKIE, "refreshToken=r-123; Path=/; HttpOnly")],
        Json(auth_json("stale")),
    )
        .into_response()
}

async fn refresh_with_cookie(headers: HeaderMap) -> Response {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if cookie.contains("refreshToken=r-123") {
        Json(json!({"accessToken": "fresh"})).into_response()
    } else {
        unauthorized()
    }
}

#[tokio::test]
async fn refresh_sends_cookie_set_at_login() {
    init_tracing();
    let backend = Backend::new(RefreshMode::Reject, "Bearer fresh");
    let router = Router::new()
        .route("/api/admin/users", get(users))
        .with_state(backend.clone())
        .route("/api/auth/login", post(login_with_cookie))
        .route("/api/auth/refresh", post(refresh_with_cookie));
    let (client, session) = client_for(&spawn_backend(router).await);

    ketoan_client::AuthApi::new(client.clone())
        .login("admin@ketoan.vn", "secret")
        .await
        .unwrap();
    assert_eq!(session.access_token().as_deref(), Some("stale"));

    let body = client
        .send_json(ApiRequest::get("/admin/users"))
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
}

// ============================================================================
// Timeout
// ============================================================================

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"success": true}))
}

#[tokio::test]
async fn slow_backend_times_out() {
    init_tracing();
    let router = Router::new().route("/api/admin/slow", get(slow));
    let base = spawn_backend(router).await;
    let client = ClientConfig::new(base)
        .with_timeout(1)
        .build_http_client(SessionStore::in_memory("/auth"))
        .unwrap();

    let err = client
        .send_json(ApiRequest::get("/admin/slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
    assert!(!err.is_auth_failure());
}
