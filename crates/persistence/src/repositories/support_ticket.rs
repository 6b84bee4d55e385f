//! Support ticket repository for database operations.
//!
//! Ticket numbers come from a single-row counter table bumped inside the
//! insert transaction, so concurrent creates serialize on the row lock
//! and a rolled-back insert rolls the increment back with it. A unique
//! violation on the formatted number can only mean rows bypassed the
//! counter (legacy imports); the counter is re-synced and the insert
//! retried a bounded number of times.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    CreateSupportTicketRequest, ListSupportTicketsQuery, SupportTicket, TicketStatus,
    UpdateSupportTicketRequest,
};
use domain::services::{format_ticket_number, parse_ticket_number, ticket_effects, TicketScope};
use shared::pagination::PageParams;

use crate::entities::SupportTicketEntity;
use crate::metrics::QueryTimer;

/// Insert attempts before a persistent ticket-number collision is
/// surfaced to the caller.
const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Helper struct for building dynamic WHERE clauses from the actor's
/// row scope plus the query filters. Scope conditions come first.
struct TicketFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl TicketFilterBuilder {
    fn build(scope: TicketScope, query: &ListSupportTicketsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        match scope {
            TicketScope::All => {}
            TicketScope::Nothing => conditions.push("FALSE".to_string()),
            TicketScope::BranchOnly(_) => {
                param_count += 1;
                conditions.push(format!("branch_id = ${}", param_count));
            }
            TicketScope::AssignedOrUnassigned(_) => {
                param_count += 1;
                conditions.push(format!(
                    "(assigned_to = ${p} OR assigned_to IS NULL)",
                    p = param_count
                ));
            }
        }

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(ticket_number ILIKE ${p} OR title ILIKE ${p} OR description ILIKE ${p})",
                p = param_count
            ));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.priority.is_some() {
            param_count += 1;
            conditions.push(format!("priority = ${}", param_count));
        }

        if query.category.is_some() {
            param_count += 1;
            conditions.push(format!("category = ${}", param_count));
        }

        if query.branch_id.is_some() {
            param_count += 1;
            conditions.push(format!("branch_id = ${}", param_count));
        }

        if query.assigned_to.is_some() {
            param_count += 1;
            conditions.push(format!("assigned_to = ${}", param_count));
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
macro_rules! bind_ticket_filters {
    ($builder:expr, $scope:expr, $query:expr) => {{
        let mut b = $builder;
        match $scope {
            TicketScope::BranchOnly(branch_id) => b = b.bind(branch_id),
            TicketScope::AssignedOrUnassigned(user_id) => b = b.bind(user_id),
            TicketScope::All | TicketScope::Nothing => {}
        }
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref priority) = $query.priority {
            b = b.bind(priority.to_string());
        }
        if let Some(ref category) = $query.category {
            b = b.bind(category.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        if let Some(ref assigned_to) = $query.assigned_to {
            b = b.bind(assigned_to);
        }
        b
    }};
}

fn is_ticket_number_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err
                    .constraint()
                    .map_or(false, |name| name.contains("ticket_number"))
        }
        _ => false,
    }
}

/// Repository for support ticket database operations.
#[derive(Clone)]
pub struct SupportTicketRepository {
    pool: PgPool,
}

impl SupportTicketRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ticket with a freshly assigned number. Tickets always
    /// start OPEN; `reported_by` is the creating user.
    pub async fn create(
        &self,
        request: &CreateSupportTicketRequest,
        reported_by: Option<Uuid>,
    ) -> Result<SupportTicket, sqlx::Error> {
        let timer = QueryTimer::new("create_support_ticket");
        let mut last_err = None;

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            match self.try_insert(request, reported_by).await {
                Ok(ticket) => {
                    timer.record();
                    return Ok(ticket);
                }
                Err(err) if is_ticket_number_conflict(&err) => {
                    tracing::warn!(attempt, "ticket number collision, re-syncing counter");
                    self.resync_sequence().await?;
                    last_err = Some(err);
                }
                Err(err) => {
                    timer.record();
                    return Err(err);
                }
            }
        }

        timer.record();
        Err(last_err.unwrap_or(sqlx::Error::RowNotFound))
    }

    async fn try_insert(
        &self,
        request: &CreateSupportTicketRequest,
        reported_by: Option<Uuid>,
    ) -> Result<SupportTicket, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let seq: i64 = sqlx::query_scalar(
            r#"
            UPDATE ticket_sequence SET last_value = last_value + 1
            WHERE id = TRUE
            RETURNING last_value
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;
        let ticket_number = format_ticket_number(seq);

        let entity = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            INSERT INTO support_tickets (ticket_number, title, description, category, priority,
                                         status, branch_id, atm_id, pos_terminal_id, reported_by,
                                         assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, ticket_number, title, description, category, priority, status,
                      branch_id, atm_id, pos_terminal_id, reported_by, assigned_to,
                      resolution_notes, resolved_at, closed_at, resolution_seconds,
                      created_at, updated_at
            "#,
        )
        .bind(&ticket_number)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.category.to_string())
        .bind(request.priority.to_string())
        .bind(TicketStatus::Open.to_string())
        .bind(request.branch_id)
        .bind(request.atm_id)
        .bind(request.pos_terminal_id)
        .bind(reported_by)
        .bind(request.assigned_to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(entity.into())
    }

    /// Bring the counter up to the highest well-formed number actually
    /// present, so the next attempt does not collide again.
    async fn resync_sequence(&self) -> Result<(), sqlx::Error> {
        let max_number: Option<String> = sqlx::query_scalar(
            r#"
            SELECT ticket_number
            FROM support_tickets
            WHERE ticket_number ~ '^TKT-[0-9]{6,}$'
            ORDER BY CAST(SUBSTRING(ticket_number FROM 5) AS BIGINT) DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        let max_value = max_number
            .as_deref()
            .and_then(parse_ticket_number)
            .unwrap_or(0);

        sqlx::query(
            "UPDATE ticket_sequence SET last_value = GREATEST(last_value, $1) WHERE id = TRUE",
        )
        .bind(max_value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Find a ticket by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportTicket>, sqlx::Error> {
        let timer = QueryTimer::new("find_support_ticket_by_id");
        let result = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            SELECT id, ticket_number, title, description, category, priority, status,
                   branch_id, atm_id, pos_terminal_id, reported_by, assigned_to,
                   resolution_notes, resolved_at, closed_at, resolution_seconds,
                   created_at, updated_at
            FROM support_tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(SupportTicket::from))
    }

    /// Partially update a ticket, computing ratchet effects from the row
    /// as it stands under lock. Ticket number, branch, links and reporter
    /// are never touched; an explicit null `assigned_to` unassigns.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateSupportTicketRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let timer = QueryTimer::new("update_support_ticket");
        let mut tx = self.pool.begin().await?;

        let prior = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            SELECT id, ticket_number, title, description, category, priority, status,
                   branch_id, atm_id, pos_terminal_id, reported_by, assigned_to,
                   resolution_notes, resolved_at, closed_at, resolution_seconds,
                   created_at, updated_at
            FROM support_tickets
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
        let prior: SupportTicket = prior.into();

        let target_status = request.status.unwrap_or(prior.status);
        let effects = ticket_effects(&prior, target_status, now);
        let set_assignee = request.assigned_to.is_some();
        let assignee_value = request.assigned_to.flatten();

        let entity = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            UPDATE support_tickets
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                status = $6,
                assigned_to = CASE WHEN $7::boolean THEN $8 ELSE assigned_to END,
                resolution_notes = COALESCE($9, resolution_notes),
                resolved_at = $10,
                closed_at = $11,
                resolution_seconds = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, ticket_number, title, description, category, priority, status,
                      branch_id, atm_id, pos_terminal_id, reported_by, assigned_to,
                      resolution_notes, resolved_at, closed_at, resolution_seconds,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.category.map(|c| c.to_string()))
        .bind(request.priority.map(|p| p.to_string()))
        .bind(target_status.to_string())
        .bind(set_assignee)
        .bind(assignee_value)
        .bind(&request.resolution_notes)
        .bind(effects.resolved_at)
        .bind(effects.closed_at)
        .bind(effects.resolution_seconds)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Delete a ticket and its comments in one transaction.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_support_ticket");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM ticket_comments WHERE ticket_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM support_tickets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List tickets the scope allows, newest first, with pagination and
    /// filtering.
    pub async fn list(
        &self,
        scope: TicketScope,
        query: &ListSupportTicketsQuery,
    ) -> Result<(Vec<SupportTicket>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_support_tickets");
        let params = PageParams::new(query.page, query.per_page);

        let filter = TicketFilterBuilder::build(scope, query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM support_tickets WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_ticket_filters!(count_builder, scope, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, ticket_number, title, description, category, priority, status,
                   branch_id, atm_id, pos_terminal_id, reported_by, assigned_to,
                   resolution_notes, resolved_at, closed_at, resolution_seconds,
                   created_at, updated_at
            FROM support_tickets
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, SupportTicketEntity>(&list_query);
        let list_builder = bind_ticket_filters!(list_builder, scope, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((
            entities.into_iter().map(SupportTicket::from).collect(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_nothing_matches_no_rows() {
        let filter =
            TicketFilterBuilder::build(TicketScope::Nothing, &ListSupportTicketsQuery::default());
        assert_eq!(filter.where_clause(), "FALSE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn test_scope_condition_comes_before_filters() {
        let query = ListSupportTicketsQuery {
            status: Some(TicketStatus::Open),
            ..Default::default()
        };
        let filter = TicketFilterBuilder::build(TicketScope::BranchOnly(Uuid::new_v4()), &query);
        let clause = filter.where_clause();
        assert!(clause.starts_with("branch_id = $1"));
        assert!(clause.contains("status = $2"));
    }

    #[test]
    fn test_assigned_or_unassigned_scope_clause() {
        let filter = TicketFilterBuilder::build(
            TicketScope::AssignedOrUnassigned(Uuid::new_v4()),
            &ListSupportTicketsQuery::default(),
        );
        assert_eq!(
            filter.where_clause(),
            "(assigned_to = $1 OR assigned_to IS NULL)"
        );
    }

    #[test]
    fn test_conflict_detection_ignores_other_errors() {
        assert!(!is_ticket_number_conflict(&sqlx::Error::RowNotFound));
    }
}
