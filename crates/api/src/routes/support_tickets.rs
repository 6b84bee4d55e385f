//! Support ticket and ticket comment endpoint handlers.
//!
//! Row visibility depends on the caller's role, so a ticket outside the
//! caller's scope 404s here exactly like one that does not exist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::{
    CreateSupportTicketRequest, CreateTicketCommentRequest, ListSupportTicketsQuery, SupportTicket,
    TicketComment, UpdateSupportTicketRequest,
};
use shared::pagination::Page;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::SupportTicketService;

/// Open a ticket. The ticket number is assigned server-side.
///
/// POST /api/v1/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateSupportTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let ticket = SupportTicketService::new(state.pool.clone())
        .create(&actor, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets the caller may see, with filters and pagination.
///
/// GET /api/v1/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListSupportTicketsQuery>,
) -> Result<Json<Page<SupportTicket>>, ApiError> {
    let page = SupportTicketService::new(state.pool.clone())
        .list(&actor, query)
        .await?;
    Ok(Json(page))
}

/// Get a single ticket.
///
/// GET /api/v1/tickets/:id
pub async fn get_ticket(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = SupportTicketService::new(state.pool.clone())
        .get(&actor, id)
        .await?;
    Ok(Json(ticket))
}

/// Partially update a ticket. Status transitions stamp resolution and
/// closure timestamps in the same write.
///
/// PATCH /api/v1/tickets/:id
pub async fn update_ticket(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSupportTicketRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = SupportTicketService::new(state.pool.clone())
        .update(&actor, id, request)
        .await?;
    Ok(Json(ticket))
}

/// Delete a ticket and its comments.
///
/// DELETE /api/v1/tickets/:id
pub async fn delete_ticket(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    SupportTicketService::new(state.pool.clone())
        .delete(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Comment on a ticket.
///
/// POST /api/v1/tickets/:id/comments
pub async fn create_ticket_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateTicketCommentRequest>,
) -> Result<(StatusCode, Json<TicketComment>), ApiError> {
    let comment = SupportTicketService::new(state.pool.clone())
        .add_comment(&actor, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// List a ticket's comments, oldest first. Internal comments are
/// omitted for roles without internal visibility.
///
/// GET /api/v1/tickets/:id/comments
pub async fn list_ticket_comments(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TicketComment>>, ApiError> {
    let comments = SupportTicketService::new(state.pool.clone())
        .list_comments(&actor, id)
        .await?;
    Ok(Json(comments))
}

/// Delete a ticket comment.
///
/// DELETE /api/v1/tickets/:ticket_id/comments/:comment_id
pub async fn delete_ticket_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((ticket_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    SupportTicketService::new(state.pool.clone())
        .delete_comment(&actor, ticket_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
