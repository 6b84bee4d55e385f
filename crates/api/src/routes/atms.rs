//! ATM endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{Atm, CreateAtmRequest, ListAtmsQuery, UpdateAtmRequest};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::AtmService;

/// Register an ATM.
///
/// POST /api/v1/atms
pub async fn create_atm(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateAtmRequest>,
) -> Result<(StatusCode, Json<Atm>), ApiError> {
    let atm = AtmService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(atm)))
}

/// List ATMs with filters and pagination.
///
/// GET /api/v1/atms
pub async fn list_atms(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListAtmsQuery>,
) -> Result<Json<Page<Atm>>, ApiError> {
    let page = AtmService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single ATM.
///
/// GET /api/v1/atms/:id
pub async fn get_atm(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Atm>, ApiError> {
    let atm = AtmService::new(state.pool.clone()).get(&actor, id).await?;
    Ok(Json(atm))
}

/// Partially update an ATM.
///
/// PATCH /api/v1/atms/:id
pub async fn update_atm(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAtmRequest>,
) -> Result<Json<Atm>, ApiError> {
    let atm = AtmService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(atm))
}

/// Delete an ATM.
///
/// DELETE /api/v1/atms/:id
pub async fn delete_atm(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    AtmService::new(state.pool.clone()).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
