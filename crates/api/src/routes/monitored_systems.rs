//! Monitored system endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{
    CreateMonitoredSystemRequest, ListMonitoredSystemsQuery, MonitoredSystem,
    UpdateMonitoredSystemRequest,
};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::MonitoredSystemService;

/// Register a monitored system.
///
/// POST /api/v1/systems
pub async fn create_monitored_system(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateMonitoredSystemRequest>,
) -> Result<(StatusCode, Json<MonitoredSystem>), ApiError> {
    let system = MonitoredSystemService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(system)))
}

/// List monitored systems with filters and pagination.
///
/// GET /api/v1/systems
pub async fn list_monitored_systems(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListMonitoredSystemsQuery>,
) -> Result<Json<Page<MonitoredSystem>>, ApiError> {
    let page = MonitoredSystemService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single monitored system.
///
/// GET /api/v1/systems/:id
pub async fn get_monitored_system(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<MonitoredSystem>, ApiError> {
    let system = MonitoredSystemService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(system))
}

/// Partially update a monitored system. Every update refreshes the
/// system's last-check timestamp.
///
/// PATCH /api/v1/systems/:id
pub async fn update_monitored_system(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMonitoredSystemRequest>,
) -> Result<Json<MonitoredSystem>, ApiError> {
    let system = MonitoredSystemService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(system))
}

/// Delete a monitored system.
///
/// DELETE /api/v1/systems/:id
pub async fn delete_monitored_system(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    MonitoredSystemService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
