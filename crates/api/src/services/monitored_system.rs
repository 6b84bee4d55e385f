//! Monitored infrastructure system operations.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreateMonitoredSystemRequest, EntityKind,
    ListMonitoredSystemsQuery, MonitoredSystem, NewAuditEntry, UpdateMonitoredSystemRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, MonitoredSystemRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct MonitoredSystemService {
    systems: MonitoredSystemRepository,
    audit: AuditLogRepository,
}

impl MonitoredSystemService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            systems: MonitoredSystemRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateMonitoredSystemRequest,
    ) -> Result<MonitoredSystem, ServiceError> {
        authorize(actor, Action::Create, EntityKind::MonitoredSystem)?;
        request.validate()?;

        let system = self.systems.create(&request).await?;
        tracing::info!(system_id = %system.id, name = %system.name, "Monitored system created");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::MonitoredSystem,
                    format!("Created monitored system {}", system.name),
                )
                .with_actor(actor)
                .with_entity_id(system.id.to_string()),
            )
            .await;

        Ok(system)
    }

    pub async fn get(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> Result<MonitoredSystem, ServiceError> {
        authorize(actor, Action::View, EntityKind::MonitoredSystem)?;
        self.systems
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Monitored system not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListMonitoredSystemsQuery,
    ) -> Result<Page<MonitoredSystem>, ServiceError> {
        authorize(actor, Action::View, EntityKind::MonitoredSystem)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.systems.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    /// Update a system. Every update stamps `last_check`, whatever fields
    /// changed, since each write doubles as a health-check touch.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateMonitoredSystemRequest,
    ) -> Result<MonitoredSystem, ServiceError> {
        authorize(actor, Action::Update, EntityKind::MonitoredSystem)?;
        request.validate()?;

        let before = self
            .systems
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Monitored system not found".to_string()))?;

        let system = self
            .systems
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Monitored system not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::MonitoredSystem,
                    format!("Updated monitored system {}", system.name),
                )
                .with_actor(actor)
                .with_entity_id(system.id.to_string())
                .with_changes(entity_changes(&before, &system)),
            )
            .await;

        Ok(system)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::MonitoredSystem)?;

        let before = self
            .systems
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Monitored system not found".to_string()))?;

        if !self.systems.delete(id).await? {
            return Err(ServiceError::NotFound(
                "Monitored system not found".to_string(),
            ));
        }
        tracing::info!(system_id = %id, name = %before.name, "Monitored system deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::MonitoredSystem,
                    format!("Deleted monitored system {}", before.name),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
