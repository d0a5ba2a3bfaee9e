// ketoan-client/tests/common/mod.rs
// Mock backend helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use ketoan_client::{ClientConfig, NetworkHttpClient, SessionStore};
use serde_json::{Value, json};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ketoan_client=debug")
        .with_test_writer()
        .try_init();
}

/// Serve `router` on an ephemeral port; returns the API base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Pipeline client against `base_url` with an in-memory session
pub fn client_for(base_url: &str) -> (Arc<NetworkHttpClient>, SessionStore) {
    let config = ClientConfig::new(base_url).with_timeout(5);
    let session = config.build_session_store();
    let client = config.build_http_client(session.clone()).unwrap();
    (Arc::new(client), session)
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn auth_json(token: &str) -> Value {
    json!({
        "accessToken": token,
        "user": {
            "id": "admin-1",
            "email": "admin@ketoan.vn",
            "fullName": "Quản trị viên",
            "role": "admin"
        }
    })
}

pub fn auth_response(token: &str) -> ketoan_client::AuthResponse {
    serde_json::from_value(auth_json(token)).unwrap()
}

pub fn owner_json(index: usize, name: &str, status: &str) -> Value {
    json!({
        "_id": format!("owner-{index:02}"),
        "userId": {
            "_id": format!("user-{index:02}"),
            "name": name,
            "email": format!("owner{index}@example.vn"),
            "isVerified": true
        },
        "businessName": name,
        "businessType": "household",
        "address": {"street": "1 Trần Phú", "ward": "", "district": "Ba Đình", "city": "Hà Nội"},
        "phoneNumber": "0900000000",
        "industry": "retail",
        "employeeCount": index,
        "businessStatus": status,
        "createdAt": "2024-03-01T08:00:00Z",
        "updatedAt": "2024-03-02T08:00:00Z"
    })
}

/// Page envelope the backend returns for `rows`, already filtered
pub fn page_json(rows: &[Value], page: u32, limit: u32) -> Value {
    let total = rows.len() as u64;
    let pages = if limit == 0 {
        0
    } else {
        total.div_ceil(u64::from(limit))
    };
    let start = ((page.max(1) - 1) * limit) as usize;
    let data: Vec<Value> = rows.iter().skip(start).take(limit as usize).cloned().collect();
    json!({
        "success": true,
        "data": data,
        "pagination": {"page": page, "limit": limit, "total": total, "pages": pages}
    })
}
