//! Alert repository for database operations.
//!
//! Listing applies the actor's row scope ahead of any query filters so
//! branch-limited staff can never page outside their branch.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Alert, AlertStatus, CreateAlertRequest, ListAlertsQuery, UpdateAlertRequest};
use domain::services::{alert_effects, AlertScope};
use shared::pagination::PageParams;

use crate::entities::AlertEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from the actor's
/// row scope plus the query filters. Scope conditions come first.
struct AlertFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AlertFilterBuilder {
    fn build(scope: AlertScope, query: &ListAlertsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        match scope {
            AlertScope::All => {}
            AlertScope::Nothing => conditions.push("FALSE".to_string()),
            AlertScope::BranchOnly(_) => {
                param_count += 1;
                conditions.push(format!("branch_id = ${}", param_count));
            }
        }

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(title ILIKE ${p} OR message ILIKE ${p})",
                p = param_count
            ));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.severity.is_some() {
            param_count += 1;
            conditions.push(format!("severity = ${}", param_count));
        }

        if query.alert_type.is_some() {
            param_count += 1;
            conditions.push(format!("alert_type = ${}", param_count));
        }

        if query.branch_id.is_some() {
            param_count += 1;
            conditions.push(format!("branch_id = ${}", param_count));
        }

        Self { conditions, param_count }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind scope and filter parameters to a SQLx builder, in the
/// same order the builder numbered them.
macro_rules! bind_alert_filters {
    ($builder:expr, $scope:expr, $query:expr) => {{
        let mut b = $builder;
        match $scope {
            AlertScope::BranchOnly(branch_id) => b = b.bind(branch_id),
            AlertScope::All | AlertScope::Nothing => {}
        }
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref severity) = $query.severity {
            b = b.bind(severity.to_string());
        }
        if let Some(ref alert_type) = $query.alert_type {
            b = b.bind(alert_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        b
    }};
}

/// Repository for alert database operations.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Raise a new alert. Alerts always start ACTIVE; the entity links
    /// are fixed at creation.
    pub async fn create(&self, request: &CreateAlertRequest) -> Result<Alert, sqlx::Error> {
        let timer = QueryTimer::new("create_alert");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            INSERT INTO alerts (alert_type, severity, status, title, message, branch_id,
                                atm_id, pos_terminal_id, security_event_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, alert_type, severity, status, title, message, branch_id, atm_id,
                      pos_terminal_id, security_event_id, acknowledged_by, acknowledged_at,
                      resolved_at, created_at, updated_at
            "#,
        )
        .bind(request.alert_type.to_string())
        .bind(request.severity.to_string())
        .bind(AlertStatus::Active.to_string())
        .bind(&request.title)
        .bind(&request.message)
        .bind(request.branch_id)
        .bind(request.atm_id)
        .bind(request.pos_terminal_id)
        .bind(request.security_event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find an alert by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, sqlx::Error> {
        let timer = QueryTimer::new("find_alert_by_id");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            SELECT id, alert_type, severity, status, title, message, branch_id, atm_id,
                   pos_terminal_id, security_event_id, acknowledged_by, acknowledged_at,
                   resolved_at, created_at, updated_at
            FROM alerts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Alert::from))
    }

    /// Partially update an alert, computing acknowledgement and resolution
    /// stamps from the row as it stands under lock. `actor_id` is recorded
    /// as the acknowledger when this update first acknowledges the alert.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateAlertRequest,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let timer = QueryTimer::new("update_alert");
        let mut tx = self.pool.begin().await?;

        let prior = sqlx::query_as::<_, AlertEntity>(
            r#"
            SELECT id, alert_type, severity, status, title, message, branch_id, atm_id,
                   pos_terminal_id, security_event_id, acknowledged_by, acknowledged_at,
                   resolved_at, created_at, updated_at
            FROM alerts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(prior) = prior else {
            timer.record();
            return Ok(None);
        };
        let prior: Alert = prior.into();

        let target_status = request.status.unwrap_or(prior.status);
        let effects = alert_effects(&prior, target_status, actor_id, now);

        let entity = sqlx::query_as::<_, AlertEntity>(
            r#"
            UPDATE alerts
            SET
                title = COALESCE($2, title),
                message = COALESCE($3, message),
                severity = COALESCE($4, severity),
                status = $5,
                acknowledged_by = $6,
                acknowledged_at = $7,
                resolved_at = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, alert_type, severity, status, title, message, branch_id, atm_id,
                      pos_terminal_id, security_event_id, acknowledged_by, acknowledged_at,
                      resolved_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.message)
        .bind(request.severity.map(|s| s.to_string()))
        .bind(target_status.to_string())
        .bind(effects.acknowledged_by)
        .bind(effects.acknowledged_at)
        .bind(effects.resolved_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Delete an alert. Nothing references alerts.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_alert");
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List alerts the scope allows, newest first, with pagination and
    /// filtering.
    pub async fn list(
        &self,
        scope: AlertScope,
        query: &ListAlertsQuery,
    ) -> Result<(Vec<Alert>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_alerts");
        let params = PageParams::new(query.page, query.per_page);

        let filter = AlertFilterBuilder::build(scope, query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM alerts WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_alert_filters!(count_builder, scope, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, alert_type, severity, status, title, message, branch_id, atm_id,
                   pos_terminal_id, security_event_id, acknowledged_by, acknowledged_at,
                   resolved_at, created_at, updated_at
            FROM alerts
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, AlertEntity>(&list_query);
        let list_builder = bind_alert_filters!(list_builder, scope, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((entities.into_iter().map(Alert::from).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_nothing_matches_no_rows() {
        let filter = AlertFilterBuilder::build(AlertScope::Nothing, &ListAlertsQuery::default());
        assert_eq!(filter.where_clause(), "FALSE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn test_branch_scope_comes_before_filters() {
        let query = ListAlertsQuery {
            status: Some(AlertStatus::Active),
            ..Default::default()
        };
        let filter = AlertFilterBuilder::build(AlertScope::BranchOnly(Uuid::new_v4()), &query);
        let clause = filter.where_clause();
        assert!(clause.starts_with("branch_id = $1"));
        assert!(clause.contains("status = $2"));
    }
}
