//! User repository for database operations.
//!
//! Deleting a user detaches every row that points at them instead of
//! removing their work; only their sessions go with them. Audit rows
//! keep their snapshotted username after the link is cleared.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, User};
use shared::pagination::PageParams;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from list filters.
struct UserFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl UserFilterBuilder {
    fn build(query: &ListUsersQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(username ILIKE ${p} OR email ILIKE ${p} OR full_name ILIKE ${p} OR employee_id ILIKE ${p})",
                p = param_count
            ));
        }

        if query.role.is_some() {
            param_count += 1;
            conditions.push(format!("role = ${}", param_count));
        }

        if query.branch_id.is_some() {
            param_count += 1;
            conditions.push(format!("branch_id = ${}", param_count));
        }

        if query.is_active.is_some() {
            param_count += 1;
            conditions.push(format!("is_active = ${}", param_count));
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
macro_rules! bind_user_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref role) = $query.role {
            b = b.bind(role.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        if let Some(ref is_active) = $query.is_active {
            b = b.bind(is_active);
        }
        b
    }};
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. The password arrives already hashed.
    pub async fn create(
        &self,
        request: &CreateUserRequest,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role, phone,
                               employee_id, branch_id, department, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, username, email, password_hash, full_name, role, phone,
                      employee_id, branch_id, department, is_active, created_at, updated_at
            "#,
        )
        .bind(&request.username)
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.full_name)
        .bind(request.role.to_string())
        .bind(&request.phone)
        .bind(&request.employee_id)
        .bind(request.branch_id)
        .bind(&request.department)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, full_name, role, phone,
                   employee_id, branch_id, department, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(User::from))
    }

    /// Find a user by username, for login.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, full_name, role, phone,
                   employee_id, branch_id, department, is_active, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(User::from))
    }

    /// Partially update a user. Username and password never change here;
    /// explicit null detaches `employee_id` or `branch_id`.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateUserRequest,
    ) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let set_employee_id = request.employee_id.is_some();
        let employee_id_value = request.employee_id.clone().flatten();
        let set_branch = request.branch_id.is_some();
        let branch_value = request.branch_id.flatten();

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                phone = COALESCE($5, phone),
                employee_id = CASE WHEN $6::boolean THEN $7 ELSE employee_id END,
                branch_id = CASE WHEN $8::boolean THEN $9 ELSE branch_id END,
                department = COALESCE($10, department),
                is_active = COALESCE($11, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, full_name, role, phone,
                      employee_id, branch_id, department, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.email)
        .bind(&request.full_name)
        .bind(request.role.map(|r| r.to_string()))
        .bind(&request.phone)
        .bind(set_employee_id)
        .bind(employee_id_value)
        .bind(set_branch)
        .bind(branch_value)
        .bind(&request.department)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(User::from))
    }

    /// Delete a user, clearing every reference to them and dropping their
    /// sessions, in one transaction.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE audit_logs SET user_id = NULL WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE support_tickets SET reported_by = NULL WHERE reported_by = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE support_tickets SET assigned_to = NULL WHERE assigned_to = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE ticket_comments SET author_id = NULL WHERE author_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE security_events SET affected_user_id = NULL WHERE affected_user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE security_events SET assigned_to = NULL WHERE assigned_to = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE alerts SET acknowledged_by = NULL WHERE acknowledged_by = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE performance_reports SET generated_by = NULL WHERE generated_by = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List users alphabetically with pagination and filtering.
    pub async fn list(&self, query: &ListUsersQuery) -> Result<(Vec<User>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let params = PageParams::new(query.page, query.per_page);

        let filter = UserFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_user_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, username, email, password_hash, full_name, role, phone,
                   employee_id, branch_id, department, is_active, created_at, updated_at
            FROM users
            WHERE {}
            ORDER BY username ASC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, UserEntity>(&list_query);
        let list_builder = bind_user_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((entities.into_iter().map(User::from).collect(), total))
    }

    /// Check if a username is taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_username_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check if an employee ID is taken, optionally excluding one user
    /// (for updates).
    pub async fn employee_id_exists(
        &self,
        employee_id: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_employee_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE employee_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(employee_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::UserRole;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = UserFilterBuilder::build(&ListUsersQuery::default());
        assert_eq!(filter.where_clause(), "TRUE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn test_search_covers_employee_id() {
        let query = ListUsersQuery {
            search: Some("EMP-142".to_string()),
            role: Some(UserRole::SupportTech),
            is_active: Some(true),
            ..Default::default()
        };
        let filter = UserFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("employee_id ILIKE $1"));
        assert!(clause.contains("role = $2"));
        assert!(clause.contains("is_active = $3"));
    }
}
