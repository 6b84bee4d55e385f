//! Branch repository for database operations.
//!
//! Branch deletion owns the referential fan-out: ATMs and tickets go
//! with the branch, every other child keeps its row and drops the link.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Branch, CreateBranchRequest, ListBranchesQuery, UpdateBranchRequest};
use shared::pagination::PageParams;

use crate::entities::BranchEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from branch filters.
struct BranchFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl BranchFilterBuilder {
    fn build(query: &ListBranchesQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(code ILIKE ${p} OR name ILIKE ${p} OR region ILIKE ${p} OR city ILIKE ${p})",
                p = param_count
            ));
        }

        if query.branch_type.is_some() {
            param_count += 1;
            conditions.push(format!("branch_type = ${}", param_count));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.region.is_some() {
            param_count += 1;
            conditions.push(format!("region = ${}", param_count));
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

/// Macro to bind branch filter parameters to a SQLx builder, in the
/// same order the builder numbered them.
macro_rules! bind_branch_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref branch_type) = $query.branch_type {
            b = b.bind(branch_type.to_string());
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref region) = $query.region {
            b = b.bind(region);
        }
        b
    }};
}

/// Repository for branch database operations.
#[derive(Clone)]
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new branch.
    pub async fn create(&self, request: &CreateBranchRequest) -> Result<Branch, sqlx::Error> {
        let timer = QueryTimer::new("create_branch");
        let result = sqlx::query_as::<_, BranchEntity>(
            r#"
            INSERT INTO branches (code, name, branch_type, status, region, city, address,
                                  contact_phone, contact_email, manager_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, code, name, branch_type, status, region, city, address,
                      contact_phone, contact_email, manager_name, created_at, updated_at
            "#,
        )
        .bind(&request.code)
        .bind(&request.name)
        .bind(request.branch_type.to_string())
        .bind(request.status.to_string())
        .bind(&request.region)
        .bind(&request.city)
        .bind(&request.address)
        .bind(&request.contact_phone)
        .bind(&request.contact_email)
        .bind(&request.manager_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a branch by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>, sqlx::Error> {
        let timer = QueryTimer::new("find_branch_by_id");
        let result = sqlx::query_as::<_, BranchEntity>(
            r#"
            SELECT id, code, name, branch_type, status, region, city, address,
                   contact_phone, contact_email, manager_name, created_at, updated_at
            FROM branches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Branch::from))
    }

    /// Partially update a branch. Unset fields keep their stored values;
    /// the code is never touched.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateBranchRequest,
    ) -> Result<Option<Branch>, sqlx::Error> {
        let timer = QueryTimer::new("update_branch");
        let result = sqlx::query_as::<_, BranchEntity>(
            r#"
            UPDATE branches
            SET
                name = COALESCE($2, name),
                branch_type = COALESCE($3, branch_type),
                status = COALESCE($4, status),
                region = COALESCE($5, region),
                city = COALESCE($6, city),
                address = COALESCE($7, address),
                contact_phone = COALESCE($8, contact_phone),
                contact_email = COALESCE($9, contact_email),
                manager_name = COALESCE($10, manager_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, name, branch_type, status, region, city, address,
                      contact_phone, contact_email, manager_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.branch_type.map(|t| t.to_string()))
        .bind(request.status.map(|s| s.to_string()))
        .bind(&request.region)
        .bind(&request.city)
        .bind(&request.address)
        .bind(&request.contact_phone)
        .bind(&request.contact_email)
        .bind(&request.manager_name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Branch::from))
    }

    /// Delete a branch and fan out to its children in one transaction:
    /// tickets (with their comments) and ATMs are deleted, POS terminals,
    /// systems, events, alerts, reports and users are detached.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_branch");
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM branches WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            timer.record();
            return Ok(false);
        }

        // Tickets cascade, comments first.
        sqlx::query(
            r#"
            DELETE FROM ticket_comments
            WHERE ticket_id IN (SELECT id FROM support_tickets WHERE branch_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM support_tickets WHERE branch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // ATMs cascade; surviving rows that point at them are detached first.
        sqlx::query(
            r#"
            UPDATE support_tickets SET atm_id = NULL
            WHERE atm_id IN (SELECT id FROM atms WHERE branch_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            r#"
            UPDATE alerts SET atm_id = NULL
            WHERE atm_id IN (SELECT id FROM atms WHERE branch_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM atms WHERE branch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Everything else keeps its rows and drops the branch link.
        for table in [
            "pos_terminals",
            "monitored_systems",
            "security_events",
            "alerts",
            "performance_reports",
            "users",
        ] {
            sqlx::query(&format!(
                "UPDATE {table} SET branch_id = NULL WHERE branch_id = $1"
            ))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List branches with pagination and filtering, name ascending.
    pub async fn list(
        &self,
        query: &ListBranchesQuery,
    ) -> Result<(Vec<Branch>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_branches");
        let params = PageParams::new(query.page, query.per_page);

        let filter = BranchFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM branches WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_branch_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, code, name, branch_type, status, region, city, address,
                   contact_phone, contact_email, manager_name, created_at, updated_at
            FROM branches
            WHERE {}
            ORDER BY name ASC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, BranchEntity>(&list_query);
        let list_builder = bind_branch_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((entities.into_iter().map(Branch::from).collect(), total))
    }

    /// Check whether a branch code is already taken.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("branch_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM branches WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builder_empty_query() {
        let filter = BranchFilterBuilder::build(&ListBranchesQuery::default());
        assert_eq!(filter.where_clause(), "TRUE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn test_filter_builder_numbers_params_in_bind_order() {
        let query = ListBranchesQuery {
            search: Some("north".to_string()),
            status: Some(domain::models::BranchStatus::Active),
            ..Default::default()
        };
        let filter = BranchFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("code ILIKE $1"));
        assert!(clause.contains("status = $2"));
        assert_eq!(filter.param_count(), 2);
    }
}
