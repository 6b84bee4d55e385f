//! Alert endpoint handlers.
//!
//! Branch Managers only see alerts tied to their own branch; alerts
//! without a branch are invisible to them, both in lists and by id.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{Alert, CreateAlertRequest, ListAlertsQuery, UpdateAlertRequest};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::AlertService;

/// Raise an alert.
///
/// POST /api/v1/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<Alert>), ApiError> {
    let alert = AlertService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// List alerts the caller may see, with filters and pagination.
///
/// GET /api/v1/alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListAlertsQuery>,
) -> Result<Json<Page<Alert>>, ApiError> {
    let page = AlertService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single alert.
///
/// GET /api/v1/alerts/:id
pub async fn get_alert(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Alert>, ApiError> {
    let alert = AlertService::new(state.pool.clone()).get(&actor, id).await?;
    Ok(Json(alert))
}

/// Partially update an alert. The first acknowledgement credits the
/// acting user; resolution stamps its timestamp in the same write.
///
/// PATCH /api/v1/alerts/:id
pub async fn update_alert(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAlertRequest>,
) -> Result<Json<Alert>, ApiError> {
    let alert = AlertService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(alert))
}

/// Delete an alert.
///
/// DELETE /api/v1/alerts/:id
pub async fn delete_alert(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    AlertService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
