//! Security event endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{
    CreateSecurityEventRequest, ListSecurityEventsQuery, SecurityEvent, UpdateSecurityEventRequest,
};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::SecurityEventService;

/// Record a security event.
///
/// POST /api/v1/security-events
pub async fn create_security_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateSecurityEventRequest>,
) -> Result<(StatusCode, Json<SecurityEvent>), ApiError> {
    let event = SecurityEventService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// List security events with filters and pagination.
///
/// GET /api/v1/security-events
pub async fn list_security_events(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListSecurityEventsQuery>,
) -> Result<Json<Page<SecurityEvent>>, ApiError> {
    let page = SecurityEventService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single security event.
///
/// GET /api/v1/security-events/:id
pub async fn get_security_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<SecurityEvent>, ApiError> {
    let event = SecurityEventService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(event))
}

/// Partially update a security event. Resolving stamps the resolution
/// timestamp in the same write.
///
/// PATCH /api/v1/security-events/:id
pub async fn update_security_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSecurityEventRequest>,
) -> Result<Json<SecurityEvent>, ApiError> {
    let event = SecurityEventService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(event))
}

/// Delete a security event.
///
/// DELETE /api/v1/security-events/:id
pub async fn delete_security_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    SecurityEventService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
