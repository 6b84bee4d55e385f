//! Dashboard endpoint handler.

use axum::{extract::State, Json};

use domain::models::DashboardSummary;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::DashboardService;

/// Aggregate counts for the landing page. Open to every authenticated
/// user.
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = DashboardService::new(state.pool.clone())
        .summary(&actor)
        .await?;
    Ok(Json(summary))
}
