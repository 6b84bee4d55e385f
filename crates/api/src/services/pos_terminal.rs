//! POS terminal operations.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreatePosTerminalRequest, EntityKind, ListPosTerminalsQuery,
    NewAuditEntry, PosTerminal, UpdatePosTerminalRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, PosTerminalRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct PosTerminalService {
    terminals: PosTerminalRepository,
    audit: AuditLogRepository,
}

impl PosTerminalService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            terminals: PosTerminalRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreatePosTerminalRequest,
    ) -> Result<PosTerminal, ServiceError> {
        authorize(actor, Action::Create, EntityKind::PosTerminal)?;
        request.validate()?;

        if self.terminals.terminal_id_exists(&request.terminal_id).await? {
            return Err(ServiceError::Conflict(format!(
                "Terminal id {} is already in use",
                request.terminal_id
            )));
        }
        if self
            .terminals
            .serial_number_exists(&request.serial_number)
            .await?
        {
            return Err(ServiceError::Conflict(format!(
                "Terminal serial number {} is already in use",
                request.serial_number
            )));
        }

        let terminal = self.terminals.create(&request).await?;
        tracing::info!(
            pos_terminal_id = %terminal.id,
            terminal = %terminal.terminal_id,
            "POS terminal created"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::PosTerminal,
                    format!("Created POS terminal {}", terminal.terminal_id),
                )
                .with_actor(actor)
                .with_entity_id(terminal.id.to_string()),
            )
            .await;

        Ok(terminal)
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<PosTerminal, ServiceError> {
        authorize(actor, Action::View, EntityKind::PosTerminal)?;
        self.terminals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("POS terminal not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListPosTerminalsQuery,
    ) -> Result<Page<PosTerminal>, ServiceError> {
        authorize(actor, Action::View, EntityKind::PosTerminal)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.terminals.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdatePosTerminalRequest,
    ) -> Result<PosTerminal, ServiceError> {
        authorize(actor, Action::Update, EntityKind::PosTerminal)?;
        request.validate()?;

        let before = self
            .terminals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("POS terminal not found".to_string()))?;

        let terminal = self
            .terminals
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("POS terminal not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::PosTerminal,
                    format!("Updated POS terminal {}", terminal.terminal_id),
                )
                .with_actor(actor)
                .with_entity_id(terminal.id.to_string())
                .with_changes(entity_changes(&before, &terminal)),
            )
            .await;

        Ok(terminal)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::PosTerminal)?;

        let before = self
            .terminals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("POS terminal not found".to_string()))?;

        if !self.terminals.delete(id).await? {
            return Err(ServiceError::NotFound("POS terminal not found".to_string()));
        }
        tracing::info!(
            pos_terminal_id = %id,
            terminal = %before.terminal_id,
            "POS terminal deleted"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::PosTerminal,
                    format!("Deleted POS terminal {}", before.terminal_id),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
