//! Operational alert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, Alert, AuditAction, CreateAlertRequest, EntityKind, ListAlertsQuery,
    NewAuditEntry, UpdateAlertRequest,
};
use domain::services::{alert_in_scope, alert_scope, entity_changes, Action};
use persistence::repositories::{AlertRepository, AuditLogRepository};
use shared::pagination::{Page, PageParams};

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct AlertService {
    alerts: AlertRepository,
    audit: AuditLogRepository,
}

impl AlertService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            alerts: AlertRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateAlertRequest,
    ) -> Result<Alert, ServiceError> {
        authorize(actor, Action::Create, EntityKind::Alert)?;
        request.validate()?;

        let alert = self.alerts.create(&request).await?;
        tracing::info!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            "Alert raised"
        );

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::Alert,
                    format!("Raised alert: {}", alert.title),
                )
                .with_actor(actor)
                .with_entity_id(alert.id.to_string()),
            )
            .await;

        Ok(alert)
    }

    /// Fetch one alert. Branch-scoped actors see other branches' alerts
    /// as missing.
    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<Alert, ServiceError> {
        authorize(actor, Action::View, EntityKind::Alert)?;

        let alert = self
            .alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        if !alert_in_scope(alert_scope(actor), &alert) {
            return Err(ServiceError::NotFound("Alert not found".to_string()));
        }
        Ok(alert)
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListAlertsQuery,
    ) -> Result<Page<Alert>, ServiceError> {
        authorize(actor, Action::View, EntityKind::Alert)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.alerts.list(alert_scope(actor), &query).await?;
        Ok(Page::new(items, params, total))
    }

    /// Update an alert. The first transition into ACKNOWLEDGED credits
    /// the acting user; entering RESOLVED stamps `resolved_at` once.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateAlertRequest,
    ) -> Result<Alert, ServiceError> {
        authorize(actor, Action::Update, EntityKind::Alert)?;
        request.validate()?;

        let before = self
            .alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        let alert = self
            .alerts
            .update(id, &request, actor.user_id, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::Alert,
                    format!("Updated alert: {}", alert.title),
                )
                .with_actor(actor)
                .with_entity_id(alert.id.to_string())
                .with_changes(entity_changes(&before, &alert)),
            )
            .await;

        Ok(alert)
    }

    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::Alert)?;

        let before = self
            .alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        if !self.alerts.delete(id).await? {
            return Err(ServiceError::NotFound("Alert not found".to_string()));
        }
        tracing::info!(alert_id = %id, "Alert deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::Alert,
                    format!("Deleted alert: {}", before.title),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
