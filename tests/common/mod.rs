#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use student_monitor::{db, services::import_service::ImportOptions, state::AppState, web};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

pub const BOUNDARY: &str = "----student-monitor-test";

/// Router completo com DB em memória e sessões em memória.
pub async fn test_app() -> Router {
    test_app_with(ImportOptions::default()).await
}

pub async fn test_app_with(import_options: ImportOptions) -> Router {
    let db_pool = db::create_memory_pool().await.expect("memory pool");
    let state = AppState {
        db_pool,
        import_options,
        max_upload_bytes: 1024 * 1024,
    };
    web::routes::create_router(state).layer(SessionManagerLayer::new(MemoryStore::default()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, headers, body }
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn multipart_request(uri: &str, cookie: &str, field: &str, content_type: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"students.csv\"\r\nContent-Type: {ct}\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        ct = content_type,
        csv = csv,
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub fn session_cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("set-cookie header")
        .to_string()
}

/// Regista um mentor e devolve o cookie de sessão.
pub async fn login_cookie(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({ "email": "mentor@escola.pt", "password": "senha-segura", "firstName": "Rita" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    session_cookie(&response.headers)
}
