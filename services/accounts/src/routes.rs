//! Accounts service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::{
    error::AccountError,
    models::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest},
    state::AppState,
};

/// Create the router for the accounts service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", get(get_users).post(create_user))
        .route("/api/users/login", post(login))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = matches!(state.accounts.health_check().await, Ok(true));
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "accounts"
        })),
    )
}

/// GET /api/users
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, AccountError> {
    let users = state.accounts.find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/:id
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AccountError>,
) -> Result<impl IntoResponse, AccountError> {
    let user = state.accounts.find_by_id(id).await?;
    Ok(Json(user))
}

/// POST /api/users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, AccountError>,
) -> Result<impl IntoResponse, AccountError> {
    let user = state.accounts.create(payload).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AccountError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, AccountError>,
) -> Result<impl IntoResponse, AccountError> {
    let user = state.accounts.update(id, payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AccountError>,
) -> Result<impl IntoResponse, AccountError> {
    state.accounts.delete(id).await?;
    Ok(Json(json!({"id": id, "deleted": true})))
}

/// POST /api/users/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AccountError>,
) -> Result<impl IntoResponse, AccountError> {
    let user = state.accounts.login(payload).await?;
    Ok(Json(LoginResponse {
        user,
        message: "You are now logged in!".to_string(),
    }))
}
