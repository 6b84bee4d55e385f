//! Support ticket and comment operations.
//!
//! Ticket reads and writes pass through the actor's row scope: a branch
//! manager only ever touches their branch's tickets, and techs only
//! tickets assigned to them or unassigned. An out-of-scope ticket is
//! reported as missing, not as forbidden.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreateSupportTicketRequest, CreateTicketCommentRequest, EntityKind,
    ListSupportTicketsQuery, NewAuditEntry, SupportTicket, TicketComment,
    UpdateSupportTicketRequest,
};
use domain::services::{
    can_view_internal_comments, entity_changes, ticket_in_scope, ticket_scope, Action,
};
use persistence::repositories::{
    AuditLogRepository, SupportTicketRepository, TicketCommentRepository,
};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct SupportTicketService {
    tickets: SupportTicketRepository,
    comments: TicketCommentRepository,
    audit: AuditLogRepository,
}

impl SupportTicketService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tickets: SupportTicketRepository::new(pool.clone()),
            comments: TicketCommentRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateSupportTicketRequest,
    ) -> Result<SupportTicket, ServiceError> {
        authorize(actor, Action::Create, EntityKind::SupportTicket)?;
        request.validate()?;

        let ticket = self.tickets.create(&request, Some(actor.user_id)).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            "Ticket created"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::SupportTicket,
                    format!("Created ticket {}", ticket.ticket_number),
                )
                .with_actor(actor)
                .with_entity_id(ticket.id.to_string()),
            )
            .await;

        Ok(ticket)
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<SupportTicket, ServiceError> {
        authorize(actor, Action::View, EntityKind::SupportTicket)?;
        self.fetch_scoped(actor, id).await
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListSupportTicketsQuery,
    ) -> Result<Page<SupportTicket>, ServiceError> {
        authorize(actor, Action::View, EntityKind::SupportTicket)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.tickets.list(ticket_scope(actor), &query).await?;
        Ok(Page::new(items, params, total))
    }

    /// Update a ticket. Status transitions into RESOLVED/CLOSED stamp
    /// their one-way timestamps inside the repository transaction.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateSupportTicketRequest,
    ) -> Result<SupportTicket, ServiceError> {
        authorize(actor, Action::Update, EntityKind::SupportTicket)?;
        request.validate()?;

        let before = self.fetch_scoped(actor, id).await?;

        let ticket = self
            .tickets
            .update(id, &request, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Ticket not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::SupportTicket,
                    format!("Updated ticket {}", ticket.ticket_number),
                )
                .with_actor(actor)
                .with_entity_id(ticket.id.to_string())
                .with_changes(entity_changes(&before, &ticket)),
            )
            .await;

        Ok(ticket)
    }

    /// Delete a ticket and its comments. Admin-only, so no scope check.
    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::SupportTicket)?;

        let before = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Ticket not found".to_string()))?;

        if !self.tickets.delete(id).await? {
            return Err(ServiceError::NotFound("Ticket not found".to_string()));
        }
        tracing::info!(ticket_id = %id, ticket_number = %before.ticket_number, "Ticket deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::SupportTicket,
                    format!("Deleted ticket {}", before.ticket_number),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }

    pub async fn add_comment(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
        request: CreateTicketCommentRequest,
    ) -> Result<TicketComment, ServiceError> {
        authorize(actor, Action::Create, EntityKind::TicketComment)?;
        request.validate()?;

        let ticket = self.fetch_scoped(actor, ticket_id).await?;

        let comment = self
            .comments
            .create(ticket.id, Some(actor.user_id), &request)
            .await?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::TicketComment,
                    format!("Commented on ticket {}", ticket.ticket_number),
                )
                .with_actor(actor)
                .with_entity_id(comment.id.to_string()),
            )
            .await;

        Ok(comment)
    }

    /// Comments for a ticket, oldest first. Internal comments are
    /// filtered out for roles without internal visibility.
    pub async fn list_comments(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
    ) -> Result<Vec<TicketComment>, ServiceError> {
        authorize(actor, Action::View, EntityKind::TicketComment)?;
        let ticket = self.fetch_scoped(actor, ticket_id).await?;

        let include_internal = can_view_internal_comments(actor.role);
        Ok(self
            .comments
            .list_for_ticket(ticket.id, include_internal)
            .await?)
    }

    pub async fn delete_comment(
        &self,
        actor: &ActorContext,
        ticket_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::TicketComment)?;

        let ticket = self.fetch_scoped(actor, ticket_id).await?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.ticket_id == ticket.id)
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))?;

        if !self.comments.delete(comment.id).await? {
            return Err(ServiceError::NotFound("Comment not found".to_string()));
        }

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::TicketComment,
                    format!("Deleted a comment on ticket {}", ticket.ticket_number),
                )
                .with_actor(actor)
                .with_entity_id(comment.id.to_string()),
            )
            .await;

        Ok(())
    }

    /// Fetch a ticket, treating out-of-scope rows as absent.
    async fn fetch_scoped(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> Result<SupportTicket, ServiceError> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Ticket not found".to_string()))?;

        if !ticket_in_scope(ticket_scope(actor), &ticket) {
            return Err(ServiceError::NotFound("Ticket not found".to_string()));
        }
        Ok(ticket)
    }
}
