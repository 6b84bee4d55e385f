//! ATM fleet operations.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, Atm, AuditAction, CreateAtmRequest, EntityKind, ListAtmsQuery, NewAuditEntry,
    UpdateAtmRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AtmRepository, AuditLogRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct AtmService {
    atms: AtmRepository,
    audit: AuditLogRepository,
}

impl AtmService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            atms: AtmRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateAtmRequest,
    ) -> Result<Atm, ServiceError> {
        authorize(actor, Action::Create, EntityKind::Atm)?;
        request.validate()?;

        if self.atms.code_exists(&request.code).await? {
            return Err(ServiceError::Conflict(format!(
                "ATM code {} is already in use",
                request.code
            )));
        }
        if self.atms.serial_number_exists(&request.serial_number).await? {
            return Err(ServiceError::Conflict(format!(
                "ATM serial number {} is already in use",
                request.serial_number
            )));
        }

        let atm = self.atms.create(&request).await?;
        tracing::info!(atm_id = %atm.id, code = %atm.code, "ATM created");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::Atm,
                    format!("Created ATM {}", atm.code),
                )
                .with_actor(actor)
                .with_entity_id(atm.id.to_string()),
            )
            .await;

        Ok(atm)
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<Atm, ServiceError> {
        authorize(actor, Action::View, EntityKind::Atm)?;
        self.atms
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ATM not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListAtmsQuery,
    ) -> Result<Page<Atm>, ServiceError> {
        authorize(actor, Action::View, EntityKind::Atm)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.atms.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateAtmRequest,
    ) -> Result<Atm, ServiceError> {
        authorize(actor, Action::Update, EntityKind::Atm)?;
        request.validate()?;

        let before = self
            .atms
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ATM not found".to_string()))?;

        let atm = self
            .atms
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ATM not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::Atm,
                    format!("Updated ATM {}", atm.code),
                )
                .with_actor(actor)
                .with_entity_id(atm.id.to_string())
                .with_changes(entity_changes(&before, &atm)),
            )
            .await;

        Ok(atm)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::Atm)?;

        let before = self
            .atms
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ATM not found".to_string()))?;

        if !self.atms.delete(id).await? {
            return Err(ServiceError::NotFound("ATM not found".to_string()));
        }
        tracing::info!(atm_id = %id, code = %before.code, "ATM deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::Atm,
                    format!("Deleted ATM {}", before.code),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
