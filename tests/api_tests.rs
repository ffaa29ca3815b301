//! End-to-end tests driving the router in-process.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use user_registry::api::{create_router, AppState};
use user_registry::config::{Config, Environment};

fn spawn_app() -> Router {
    let config = Config {
        app_env: Environment::Test,
        ..Config::default()
    };
    create_router(AppState::new(&config), &config)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_alice(app: &Router) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({"username": "alice", "email": "A@X.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

#[tokio::test]
async fn create_sanitizes_and_defaults_role() {
    let app = spawn_app();
    let json = create_alice(&app).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User created successfully");
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["email"], "a@x.com");
    assert_eq!(json["data"]["role"], "user");
    assert!(json["data"].get("password").is_none());
    assert!(json["data"].get("updatedAt").is_none());
    assert!(json["data"]["createdAt"].is_string());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn create_rejects_missing_fields_and_bad_json() {
    let app = spawn_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": "bob", "email": "b@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Username, email, and password are required");

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_conflicts_on_case_insensitive_username() {
    let app = spawn_app();
    create_alice(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": "ALICE", "email": "other@x.com", "password": "p"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "User with this username or email already exists");
}

#[tokio::test]
async fn get_returns_projection_without_password() {
    let app = spawn_app();
    create_alice(&app).await;

    for uri in ["/api/users/1", "/api/users/1/profile"] {
        let (status, json) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["username"], "alice");
        assert!(json["data"].get("password").is_none());
    }

    let (status, json) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = spawn_app();

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"role": "admin"}))),
        ("DELETE", None),
    ] {
        let (status, json) = send(&app, method, "/api/users/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(json["error"], "Invalid user ID");
    }
}

#[tokio::test]
async fn delete_unknown_user_is_not_found() {
    let app = spawn_app();

    let (status, json) = send(&app, "DELETE", "/api/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "User not found");
}

#[tokio::test]
async fn update_preserves_identity_and_stamps_updated_at() {
    let app = spawn_app();
    let created = create_alice(&app).await;

    let (status, json) = send(
        &app,
        "PUT",
        "/api/users/1",
        Some(json!({"role": "admin", "id": 77, "createdAt": "2000-01-01T00:00:00Z"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User updated successfully");
    let data = &json["data"];
    assert_eq!(data["id"], 1);
    assert_eq!(data["role"], "admin");
    assert_eq!(data["username"], created["data"]["username"]);
    assert_eq!(data["email"], created["data"]["email"]);
    assert_eq!(data["createdAt"], created["data"]["createdAt"]);
    assert!(data["updatedAt"].is_string());

    let (status, _) = send(&app, "PUT", "/api/users/5", Some(json!({"role": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_not_found_and_ids_are_not_reused() {
    let app = spawn_app();
    create_alice(&app).await;

    let (status, json) = send(&app, "DELETE", "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!({"id": 1, "username": "alice"}));

    let (status, _) = send(&app, "GET", "/api/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let recreated = create_alice(&app).await;
    assert_eq!(recreated["data"]["id"], 2);
}
