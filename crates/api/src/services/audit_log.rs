//! Read-only access to the audit trail.
//!
//! Administrator-only, and reads are not themselves audited.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{ActorContext, AuditLog, EntityKind, ListAuditLogsQuery};
use domain::services::Action;
use persistence::repositories::AuditLogRepository;
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct AuditLogService {
    audit: AuditLogRepository,
}

impl AuditLogService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<AuditLog, ServiceError> {
        authorize(actor, Action::View, EntityKind::AuditLog)?;
        self.audit
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Audit entry not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListAuditLogsQuery,
    ) -> Result<Page<AuditLog>, ServiceError> {
        authorize(actor, Action::View, EntityKind::AuditLog)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.audit.list(&query).await?;
        Ok(Page::new(items, params, total))
    }
}
