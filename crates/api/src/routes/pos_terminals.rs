//! POS terminal endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{
    CreatePosTerminalRequest, ListPosTerminalsQuery, PosTerminal, UpdatePosTerminalRequest,
};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::PosTerminalService;

/// Register a POS terminal.
///
/// POST /api/v1/pos-terminals
pub async fn create_pos_terminal(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreatePosTerminalRequest>,
) -> Result<(StatusCode, Json<PosTerminal>), ApiError> {
    let terminal = PosTerminalService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(terminal)))
}

/// List POS terminals with filters and pagination.
///
/// GET /api/v1/pos-terminals
pub async fn list_pos_terminals(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListPosTerminalsQuery>,
) -> Result<Json<Page<PosTerminal>>, ApiError> {
    let page = PosTerminalService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single POS terminal.
///
/// GET /api/v1/pos-terminals/:id
pub async fn get_pos_terminal(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<PosTerminal>, ApiError> {
    let terminal = PosTerminalService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(terminal))
}

/// Partially update a POS terminal.
///
/// PATCH /api/v1/pos-terminals/:id
pub async fn update_pos_terminal(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePosTerminalRequest>,
) -> Result<Json<PosTerminal>, ApiError> {
    let terminal = PosTerminalService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(terminal))
}

/// Delete a POS terminal.
///
/// DELETE /api/v1/pos-terminals/:id
pub async fn delete_pos_terminal(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PosTerminalService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
