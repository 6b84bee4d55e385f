//! Security event repository for database operations.
//!
//! Row visibility is all-or-nothing for this table and enforced above
//! the repository, so the list query carries no scope conditions.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    CreateSecurityEventRequest, ListSecurityEventsQuery, SecurityEvent, SecurityEventStatus,
    UpdateSecurityEventRequest,
};
use domain::services::security_event_effects;
use shared::pagination::PageParams;

use crate::entities::SecurityEventEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from list filters.
struct SecurityEventFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl SecurityEventFilterBuilder {
    fn build(query: &ListSecurityEventsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(title ILIKE ${p} OR description ILIKE ${p} OR source_ip ILIKE ${p})",
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

        if query.event_type.is_some() {
            param_count += 1;
            conditions.push(format!("event_type = ${}", param_count));
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

/// Macro to bind filter parameters to a SQLx builder in the same order
/// the builder numbered them.
macro_rules! bind_security_event_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref severity) = $query.severity {
            b = b.bind(severity.to_string());
        }
        if let Some(ref event_type) = $query.event_type {
            b = b.bind(event_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        b
    }};
}

/// Repository for security event database operations.
#[derive(Clone)]
pub struct SecurityEventRepository {
    pool: PgPool,
}

impl SecurityEventRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a new security event. Events start NEW; `detected_at`
    /// falls back to the insert time when the report omits it.
    pub async fn create(
        &self,
        request: &CreateSecurityEventRequest,
    ) -> Result<SecurityEvent, sqlx::Error> {
        let timer = QueryTimer::new("create_security_event");
        let result = sqlx::query_as::<_, SecurityEventEntity>(
            r#"
            INSERT INTO security_events (event_type, severity, status, title, description,
                                         branch_id, affected_user_id, assigned_to, source_ip,
                                         detected_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, NOW()))
            RETURNING id, event_type, severity, status, title, description, branch_id,
                      affected_user_id, assigned_to, source_ip, detected_at, resolved_at,
                      resolution_notes, created_at, updated_at
            "#,
        )
        .bind(request.event_type.to_string())
        .bind(request.severity.to_string())
        .bind(SecurityEventStatus::New.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.branch_id)
        .bind(request.affected_user_id)
        .bind(request.assigned_to)
        .bind(&request.source_ip)
        .bind(request.detected_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a security event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SecurityEvent>, sqlx::Error> {
        let timer = QueryTimer::new("find_security_event_by_id");
        let result = sqlx::query_as::<_, SecurityEventEntity>(
            r#"
            SELECT id, event_type, severity, status, title, description, branch_id,
                   affected_user_id, assigned_to, source_ip, detected_at, resolved_at,
                   resolution_notes, created_at, updated_at
            FROM security_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(SecurityEvent::from))
    }

    /// Partially update a security event, computing the resolution stamp
    /// from the row as it stands under lock. The nullable links detach on
    /// explicit null.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateSecurityEventRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<SecurityEvent>, sqlx::Error> {
        let timer = QueryTimer::new("update_security_event");
        let mut tx = self.pool.begin().await?;

        let prior = sqlx::query_as::<_, SecurityEventEntity>(
            r#"
            SELECT id, event_type, severity, status, title, description, branch_id,
                   affected_user_id, assigned_to, source_ip, detected_at, resolved_at,
                   resolution_notes, created_at, updated_at
            FROM security_events
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
        let prior: SecurityEvent = prior.into();

        let target_status = request.status.unwrap_or(prior.status);
        let effects = security_event_effects(&prior, target_status, now);
        let set_branch = request.branch_id.is_some();
        let branch_value = request.branch_id.flatten();
        let set_affected_user = request.affected_user_id.is_some();
        let affected_user_value = request.affected_user_id.flatten();
        let set_assignee = request.assigned_to.is_some();
        let assignee_value = request.assigned_to.flatten();

        let entity = sqlx::query_as::<_, SecurityEventEntity>(
            r#"
            UPDATE security_events
            SET
                event_type = COALESCE($2, event_type),
                severity = COALESCE($3, severity),
                status = $4,
                title = COALESCE($5, title),
                description = COALESCE($6, description),
                branch_id = CASE WHEN $7::boolean THEN $8 ELSE branch_id END,
                affected_user_id = CASE WHEN $9::boolean THEN $10 ELSE affected_user_id END,
                assigned_to = CASE WHEN $11::boolean THEN $12 ELSE assigned_to END,
                source_ip = COALESCE($13, source_ip),
                resolution_notes = COALESCE($14, resolution_notes),
                resolved_at = $15,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, event_type, severity, status, title, description, branch_id,
                      affected_user_id, assigned_to, source_ip, detected_at, resolved_at,
                      resolution_notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.event_type.map(|t| t.to_string()))
        .bind(request.severity.map(|s| s.to_string()))
        .bind(target_status.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(set_branch)
        .bind(branch_value)
        .bind(set_affected_user)
        .bind(affected_user_value)
        .bind(set_assignee)
        .bind(assignee_value)
        .bind(&request.source_ip)
        .bind(&request.resolution_notes)
        .bind(effects.resolved_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Delete a security event, detaching alerts that reference it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_security_event");
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE alerts SET security_event_id = NULL WHERE security_event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM security_events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List security events, most recently detected first, with pagination
    /// and filtering.
    pub async fn list(
        &self,
        query: &ListSecurityEventsQuery,
    ) -> Result<(Vec<SecurityEvent>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_security_events");
        let params = PageParams::new(query.page, query.per_page);

        let filter = SecurityEventFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM security_events WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_security_event_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, event_type, severity, status, title, description, branch_id,
                   affected_user_id, assigned_to, source_ip, detected_at, resolved_at,
                   resolution_notes, created_at, updated_at
            FROM security_events
            WHERE {}
            ORDER BY detected_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, SecurityEventEntity>(&list_query);
        let list_builder = bind_security_event_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((
            entities.into_iter().map(SecurityEvent::from).collect(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Severity;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = SecurityEventFilterBuilder::build(&ListSecurityEventsQuery::default());
        assert_eq!(filter.where_clause(), "TRUE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn test_search_reuses_one_parameter() {
        let query = ListSecurityEventsQuery {
            search: Some("198.51.100".to_string()),
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        let filter = SecurityEventFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("source_ip ILIKE $1"));
        assert!(clause.contains("severity = $2"));
        assert_eq!(filter.param_count(), 2);
    }
}
