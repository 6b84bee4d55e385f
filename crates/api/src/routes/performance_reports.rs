//! Performance report endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{
    CreatePerformanceReportRequest, ListPerformanceReportsQuery, PerformanceReport,
    UpdatePerformanceReportRequest,
};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::PerformanceReportService;

/// Create a report. The caller is recorded as its generator.
///
/// POST /api/v1/reports
pub async fn create_report(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreatePerformanceReportRequest>,
) -> Result<(StatusCode, Json<PerformanceReport>), ApiError> {
    let report = PerformanceReportService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// List reports with filters and pagination.
///
/// GET /api/v1/reports
pub async fn list_reports(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListPerformanceReportsQuery>,
) -> Result<Json<Page<PerformanceReport>>, ApiError> {
    let page = PerformanceReportService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single report.
///
/// GET /api/v1/reports/:id
pub async fn get_report(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<PerformanceReport>, ApiError> {
    let report = PerformanceReportService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(report))
}

/// Partially update a report.
///
/// PATCH /api/v1/reports/:id
pub async fn update_report(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePerformanceReportRequest>,
) -> Result<Json<PerformanceReport>, ApiError> {
    let report = PerformanceReportService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(report))
}

/// Delete a report.
///
/// DELETE /api/v1/reports/:id
pub async fn delete_report(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PerformanceReportService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
