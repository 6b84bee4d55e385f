//! Branch endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{Branch, CreateBranchRequest, ListBranchesQuery, UpdateBranchRequest};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::BranchService;

/// Create a branch.
///
/// POST /api/v1/branches
pub async fn create_branch(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateBranchRequest>,
) -> Result<(StatusCode, Json<Branch>), ApiError> {
    let branch = BranchService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

/// List branches with filters and pagination.
///
/// GET /api/v1/branches
pub async fn list_branches(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListBranchesQuery>,
) -> Result<Json<Page<Branch>>, ApiError> {
    let page = BranchService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single branch.
///
/// GET /api/v1/branches/:id
pub async fn get_branch(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Branch>, ApiError> {
    let branch = BranchService::new(state.pool.clone()).get(&actor, id).await?;
    Ok(Json(branch))
}

/// Partially update a branch.
///
/// PATCH /api/v1/branches/:id
pub async fn update_branch(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBranchRequest>,
) -> Result<Json<Branch>, ApiError> {
    let branch = BranchService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(branch))
}

/// Delete a branch. Equipment in the branch survives with its branch
/// link cleared.
///
/// DELETE /api/v1/branches/:id
pub async fn delete_branch(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    BranchService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
