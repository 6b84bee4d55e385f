//! Performance report operations.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreatePerformanceReportRequest, EntityKind,
    ListPerformanceReportsQuery, NewAuditEntry, PerformanceReport,
    UpdatePerformanceReportRequest,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, PerformanceReportRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct PerformanceReportService {
    reports: PerformanceReportRepository,
    audit: AuditLogRepository,
}

impl PerformanceReportService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reports: PerformanceReportRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreatePerformanceReportRequest,
    ) -> Result<PerformanceReport, ServiceError> {
        authorize(actor, Action::Create, EntityKind::PerformanceReport)?;
        request.validate()?;

        let report = self.reports.create(&request, Some(actor.user_id)).await?;
        tracing::info!(
            report_id = %report.id,
            report_type = %report.report_type,
            "Performance report created"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::PerformanceReport,
                    format!("Created report: {}", report.title),
                )
                .with_actor(actor)
                .with_entity_id(report.id.to_string()),
            )
            .await;

        Ok(report)
    }

    pub async fn get(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> Result<PerformanceReport, ServiceError> {
        authorize(actor, Action::View, EntityKind::PerformanceReport)?;
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListPerformanceReportsQuery,
    ) -> Result<Page<PerformanceReport>, ServiceError> {
        authorize(actor, Action::View, EntityKind::PerformanceReport)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.reports.list(&query).await?;
        Ok(Page::new(items, params, total))
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdatePerformanceReportRequest,
    ) -> Result<PerformanceReport, ServiceError> {
        authorize(actor, Action::Update, EntityKind::PerformanceReport)?;
        request.validate()?;

        let before = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        let report = self
            .reports
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::PerformanceReport,
                    format!("Updated report: {}", report.title),
                )
                .with_actor(actor)
                .with_entity_id(report.id.to_string())
                .with_changes(entity_changes(&before, &report)),
            )
            .await;

        Ok(report)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::PerformanceReport)?;

        let before = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        if !self.reports.delete(id).await? {
            return Err(ServiceError::NotFound("Report not found".to_string()));
        }
        tracing::info!(report_id = %id, "Performance report deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::PerformanceReport,
                    format!("Deleted report: {}", before.title),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
