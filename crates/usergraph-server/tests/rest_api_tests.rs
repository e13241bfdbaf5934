//! Integration tests for REST API endpoints
//!
//! The router runs against the in-memory store, so these need no database.
//! Store behaviour against Neo4j itself is covered in usergraph-graph.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use usergraph_core::config::ServerSettings;
use usergraph_graph::MemoryStore;
use usergraph_server::{build_router, AppState};

fn app_with(store: Arc<MemoryStore>) -> Router {
    build_router(AppState::new(store), &ServerSettings::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn create_user(app: &Router, name: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/users",
        json!({"name": name, "email": format!("{}@example.com", name.to_lowercase())}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn relate(app: &Router, from: &Value, to: &Value, kind: &str) -> (StatusCode, Value) {
    post(
        app,
        "/api/relationships",
        json!({"fromUserId": from["id"], "toUserId": to["id"], "type": kind}),
    )
    .await
}

#[tokio::test]
async fn test_create_user_returns_created_record() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let user = create_user(&app, "Ada").await;
    assert_eq!(user["name"], "Ada");
    assert_eq!(user["email"], "ada@example.com");
    assert!(!user["id"].as_str().unwrap().is_empty());

    let created_at = user["createdAt"].as_str().unwrap();
    assert!(created_at.parse::<u64>().is_ok());
}

#[tokio::test]
async fn test_create_user_twice_gives_distinct_ids() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let first = create_user(&app, "Ada").await;
    let second = create_user(&app, "Ada").await;
    assert_ne!(first["id"], second["id"]);

    let (status, users) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_user_is_rejected_before_write() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());

    let (status, body) = post(
        &app,
        "/api/users",
        json!({"name": "", "email": "not-an-email"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email"]);

    let (_, users) = get(&app, "/api/users").await;
    assert!(users.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let (status, body) = get(&app, "/api/users/never-created").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_friendship_visible_from_both_users() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let a = create_user(&app, "Alice").await;
    let b = create_user(&app, "Bob").await;

    let (status, body) = relate(&app, &a, &b, "FRIEND").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true}));

    for (me, friend) in [(&a, &b), (&b, &a)] {
        let uri = format!("/api/users/{}", me["id"].as_str().unwrap());
        let (status, view) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["id"], me["id"]);
        assert_eq!(view["relationshipCount"], 1);
        assert_eq!(view["friends"][0]["id"], friend["id"]);
    }
}

#[tokio::test]
async fn test_list_relationships_returns_each_edge() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let a = create_user(&app, "A").await;
    let b = create_user(&app, "B").await;
    let c = create_user(&app, "C").await;

    assert_eq!(relate(&app, &a, &b, "FRIEND").await.0, StatusCode::CREATED);
    assert_eq!(relate(&app, &b, &c, "COLLEAGUE").await.0, StatusCode::CREATED);

    let (status, body) = get(&app, "/api/relationships").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);

    assert_eq!(list[0]["from"]["id"], a["id"]);
    assert_eq!(list[0]["to"]["id"], b["id"]);
    assert_eq!(list[0]["type"], "FRIEND");
    assert_eq!(list[1]["from"]["id"], b["id"]);
    assert_eq!(list[1]["to"]["id"], c["id"]);
    assert_eq!(list[1]["type"], "COLLEAGUE");
    assert_eq!(list[1]["to"]["email"], "c@example.com");
}

#[tokio::test]
async fn test_unknown_relationship_type_never_reaches_store() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());
    let a = create_user(&app, "A").await;
    let b = create_user(&app, "B").await;

    let (status, body) = relate(&app, &a, &b, "ENEMY").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "type");
    assert_eq!(store.relationship_count(), 0);
}

#[tokio::test]
async fn test_self_relationship_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());
    let a = create_user(&app, "A").await;

    let (status, body) = relate(&app, &a, &a, "FAMILY").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "toUserId");
    assert_eq!(store.relationship_count(), 0);
}

#[tokio::test]
async fn test_relationship_to_missing_user_is_bad_request() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let a = create_user(&app, "A").await;

    let (status, body) = post(
        &app,
        "/api/relationships",
        json!({"fromUserId": a["id"], "toUserId": "nobody", "type": "FRIEND"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to create relationship");
}

#[tokio::test]
async fn test_store_failures_are_generic_500s() {
    let app = app_with(Arc::new(MemoryStore::unavailable()));

    let (status, body) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch users"}));

    let (status, body) = post(
        &app,
        "/api/users",
        json!({"name": "Ada", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create user"}));

    let (status, _) = get(&app, "/api/users/anyone").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = get(&app, "/api/relationships").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = post(
        &app,
        "/api/relationships",
        json!({"fromUserId": "a", "toUserId": "b", "type": "FRIEND"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create relationship"}));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
    assert_eq!(get(&app, "/health/ready").await.0, StatusCode::OK);

    let down = app_with(Arc::new(MemoryStore::unavailable()));
    assert_eq!(get(&down, "/health/ready").await.0, StatusCode::SERVICE_UNAVAILABLE);
}
