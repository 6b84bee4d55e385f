//! Security event operations.
//!
//! Visibility is all-or-nothing: the policy table limits every action,
//! reads included, to administrators and security officers, so no row
//! scope applies here.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreateSecurityEventRequest, EntityKind, ListSecurityEventsQuery,
    NewAuditEntry, SecurityEvent, UpdateSecurityEventRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, SecurityEventRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct SecurityEventService {
    events: SecurityEventRepository,
    audit: AuditLogRepository,
}

impl SecurityEventService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: SecurityEventRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateSecurityEventRequest,
    ) -> Result<SecurityEvent, ServiceError> {
        authorize(actor, Action::Create, EntityKind::SecurityEvent)?;
        request.validate()?;

        let event = self.events.create(&request).await?;
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            severity = %event.severity,
            "Security event recorded"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::SecurityEvent,
                    format!("Recorded security event: {}", event.title),
                )
                .with_actor(actor)
                .with_entity_id(event.id.to_string()),
            )
            .await;

        Ok(event)
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<SecurityEvent, ServiceError> {
        authorize(actor, Action::View, EntityKind::SecurityEvent)?;
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Security event not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListSecurityEventsQuery,
    ) -> Result<Page<SecurityEvent>, ServiceError> {
        authorize(actor, Action::View, EntityKind::SecurityEvent)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.events.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    /// Update an event. A transition into RESOLVED stamps `resolved_at`
    /// once, inside the repository transaction.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateSecurityEventRequest,
    ) -> Result<SecurityEvent, ServiceError> {
        authorize(actor, Action::Update, EntityKind::SecurityEvent)?;
        request.validate()?;

        let before = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Security event not found".to_string()))?;

        let event = self
            .events
            .update(id, &request, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Security event not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::SecurityEvent,
                    format!("Updated security event: {}", event.title),
                )
                .with_actor(actor)
                .with_entity_id(event.id.to_string())
                .with_changes(entity_changes(&before, &event)),
            )
            .await;

        Ok(event)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::SecurityEvent)?;

        let before = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Security event not found".to_string()))?;

        if !self.events.delete(id).await? {
            return Err(ServiceError::NotFound(
                "Security event not found".to_string(),
            ));
        }
        tracing::info!(event_id = %id, "Security event deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::SecurityEvent,
                    format!("Deleted security event: {}", before.title),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
