//! REST API routes using Axum.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use usergraph_core::config::ServerSettings;
use usergraph_core::validation::{validate_create_relationship, validate_create_user};
use usergraph_core::{RelationshipDisplay, User, UserId, UserWithRelationships};
use usergraph_graph::{GraphError, UserStore};

use crate::error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState, settings: &ServerSettings) -> Router {
    Router::new()
        .route("/api/users", get(list_users_handler).post(create_user_handler))
        .route("/api/users/{id}", get(get_user_handler))
        .route(
            "/api/relationships",
            get(list_relationships_handler).post(create_relationship_handler),
        )
        .route("/health", get(health_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
    } else if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_origin(origins)
    }
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidJson(rejection.body_text()))
}

/// GET /api/users
async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(|e| ApiError::store("Failed to fetch users", e))?;
    Ok(Json(users))
}

/// POST /api/users
async fn create_user_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let input = validate_create_user(&json_body(body)?)?;

    let user = state
        .store
        .create_user(&input)
        .await
        .map_err(|e| ApiError::store("Failed to create user", e))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}
async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserWithRelationships>, ApiError> {
    state
        .store
        .get_user_with_relationships(&UserId::from(id))
        .await
        .map_err(|e| ApiError::store("Failed to fetch user", e))?
        .map(Json)
        .ok_or(ApiError::NotFound("User not found"))
}

/// GET /api/relationships
async fn list_relationships_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RelationshipDisplay>>, ApiError> {
    let relationships = state
        .store
        .list_relationships()
        .await
        .map_err(|e| ApiError::store("Failed to fetch relationships", e))?;
    Ok(Json(relationships))
}

/// POST /api/relationships
async fn create_relationship_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = validate_create_relationship(&json_body(body)?)?;

    state
        .store
        .create_relationship(&input)
        .await
        .map_err(|e| match e {
            GraphError::EndpointNotFound { .. } | GraphError::InvalidInput(_) => {
                ApiError::Rejected {
                    message: "Failed to create relationship",
                    source: e,
                }
            }
            other => ApiError::store("Failed to create relationship", other),
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// GET /health
///
/// Liveness only; does not touch the store.
async fn health_handler() -> &'static str {
    "ok"
}

/// GET /health/ready
async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.store.verify_connection().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
