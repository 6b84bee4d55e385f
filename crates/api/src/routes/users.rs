//! User administration endpoint handlers. Administrator-only; the
//! policy check lives in the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::UserService;

/// Create an operator account.
///
/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = UserService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List operator accounts with filters and pagination.
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let page = UserService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single operator account.
///
/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::new(state.pool.clone()).get(&actor, id).await?;
    Ok(Json(user))
}

/// Partially update an operator account.
///
/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(user))
}

/// Delete an operator account. Records they authored survive with the
/// author link cleared.
///
/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    UserService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
