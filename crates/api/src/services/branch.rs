//! Branch operations.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, Branch, CreateBranchRequest, EntityKind, ListBranchesQuery,
    NewAuditEntry, UpdateBranchRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, BranchRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct BranchService {
    branches: BranchRepository,
    audit: AuditLogRepository,
}

impl BranchService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            branches: BranchRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        authorize(actor, Action::Create, EntityKind::Branch)?;
        request.validate()?;

        if self.branches.code_exists(&request.code).await? {
            return Err(ServiceError::Conflict(format!(
                "Branch code {} is already in use",
                request.code
            )));
        }

        let branch = self.branches.create(&request).await?;
        tracing::info!(branch_id = %branch.id, code = %branch.code, "Branch created");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::Branch,
                    format!("Created branch {}", branch.code),
                )
                .with_actor(actor)
                .with_entity_id(branch.id.to_string()),
            )
            .await;

        Ok(branch)
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<Branch, ServiceError> {
        authorize(actor, Action::View, EntityKind::Branch)?;
        self.branches
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListBranchesQuery,
    ) -> Result<Page<Branch>, ServiceError> {
        authorize(actor, Action::View, EntityKind::Branch)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.branches.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        authorize(actor, Action::Update, EntityKind::Branch)?;
        request.validate()?;

        let before = self
            .branches
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))?;

        let branch = self
            .branches
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::Branch,
                    format!("Updated branch {}", branch.code),
                )
                .with_actor(actor)
                .with_entity_id(branch.id.to_string())
                .with_changes(entity_changes(&before, &branch)),
            )
            .await;

        Ok(branch)
    }

    /// Delete a branch with its referential fan-out: ATMs, POS terminals
    /// and the rest are handled inside the repository transaction.
    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::Branch)?;

        let before = self
            .branches
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))?;

        if !self.branches.delete(id).await? {
            return Err(ServiceError::NotFound("Branch not found".to_string()));
        }
        tracing::info!(branch_id = %id, code = %before.code, "Branch deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::Branch,
                    format!("Deleted branch {}", before.code),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
