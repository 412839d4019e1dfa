//! HTTP-level tests for the user routes, against the in-memory store

use accounts::{
    AccountStore, AppState,
    password::{CredentialHasher, HasherConfig},
    routes::create_router,
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let hasher = CredentialHasher::new(&HasherConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid hasher params");
    create_router(AppState::new(AccountStore::in_memory(hasher)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_alice(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "alice", "email": "a@x.com", "password": "pw1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn assert_no_secret(value: &Value) {
    let rendered = value.to_string();
    assert!(!rendered.contains("password"), "leaked: {}", rendered);
    assert!(!rendered.contains("argon2"), "leaked: {}", rendered);
}

#[tokio::test]
async fn test_create_user_returns_projection() {
    let app = app();
    let body = create_alice(&app).await;

    assert_eq!(body, json!({"id": 1, "username": "alice", "email": "a@x.com"}));
    assert_no_secret(&body);
}

#[tokio::test]
async fn test_list_and_get_never_include_secret() {
    let app = app();
    create_alice(&app).await;

    let (status, list) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_no_secret(&list);

    let (status, user) = send(&app, Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "a@x.com");
    assert_no_secret(&user);
}

#[tokio::test]
async fn test_get_unknown_user_is_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No user found with this id");
}

#[tokio::test]
async fn test_create_validation_failures_are_400() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "alice", "email": "a@x.com", "password": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 4"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "alice", "email": "nope", "password": "pw1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"email": "a@x.com", "password": "pw1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = app();
    create_alice(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "other", "email": "a@x.com", "password": "pw5678"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email address is already in use");

    let (_, list) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_login_success_and_failures_look_alike() {
    let app = app();
    create_alice(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "a@x.com", "password": "pw1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["message"], "You are now logged in!");
    assert_no_secret(&body["user"]);

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "a@x.com", "password": "wrong"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "nobody@x.com", "password": "pw1234"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_password_change_via_put() {
    let app = app();
    create_alice(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/users/1",
        Some(json!({"password": "newpw12"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_no_secret(&body);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "a@x.com", "password": "newpw12"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "a@x.com", "password": "pw1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_errors() {
    let app = app();
    create_alice(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/users/7",
        Some(json!({"username": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/users/1",
        Some(json!({"email": "broken"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_to_taken_email_is_400() {
    let app = app();
    create_alice(&app).await;
    let (status, bob) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "bob", "email": "b@x.com", "password": "pw5678"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/users/{}", bob["id"]);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email address is already in use");

    let (_, bob) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(bob["email"], "b@x.com");
}

#[tokio::test]
async fn test_malformed_bodies_are_400_with_json_error() {
    let app = app();

    let payloads = [
        json!({"username": null, "email": "a@x.com", "password": "pw1234"}),
        json!({"username": "alice", "email": "a@x.com", "password": 1234}),
        json!("alice"),
    ];
    for payload in payloads {
        let (status, body) = send(&app, Method::POST, "/api/users", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "body: {}", body);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({"email": "a@x.com", "password": false})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, users) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_missing_content_type_is_400_with_json_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(Body::from(
            json!({"username": "alice", "email": "a@x.com", "password": "pw1234"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Content-Type"));
}

#[tokio::test]
async fn test_non_numeric_id_is_400_with_json_error() {
    let app = app();
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/api/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "body: {}", body);
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/users/abc",
        Some(json!({"username": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = app();
    create_alice(&app).await;

    let (status, body) = send(&app, Method::DELETE, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "deleted": true}));

    let (status, _) = send(&app, Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "accounts"}));
}
