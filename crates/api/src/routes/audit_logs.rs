//! Audit trail endpoint handlers. Read-only; entries are written by
//! the services and never through this surface.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use domain::models::{AuditLog, ListAuditLogsQuery};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::AuditLogService;

/// List audit entries with filters and pagination.
///
/// GET /api/v1/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<Page<AuditLog>>, ApiError> {
    let page = AuditLogService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single audit entry.
///
/// GET /api/v1/audit-logs/:id
pub async fn get_audit_log(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<AuditLog>, ApiError> {
    let entry = AuditLogService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(entry))
}
