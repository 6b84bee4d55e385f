//! Monitored system repository for database operations.
//!
//! Updates always refresh `last_check`, whatever fields changed, so the
//! column doubles as a heartbeat for operator-entered readings.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    CreateMonitoredSystemRequest, ListMonitoredSystemsQuery, MonitoredSystem,
    UpdateMonitoredSystemRequest,
};
use shared::pagination::PageParams;

use crate::entities::MonitoredSystemEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from system filters.
struct SystemFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl SystemFilterBuilder {
    fn build(query: &ListMonitoredSystemsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(name ILIKE ${p} OR hostname ILIKE ${p} OR ip_address ILIKE ${p})",
                p = param_count
            ));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.system_type.is_some() {
            param_count += 1;
            conditions.push(format!("system_type = ${}", param_count));
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

/// Macro to bind system filter parameters to a SQLx builder, in the same
/// order the builder numbered them.
macro_rules! bind_system_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref system_type) = $query.system_type {
            b = b.bind(system_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        b
    }};
}

/// Repository for monitored system database operations.
#[derive(Clone)]
pub struct MonitoredSystemRepository {
    pool: PgPool,
}

impl MonitoredSystemRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new monitored system. `last_check` starts at now.
    pub async fn create(
        &self,
        request: &CreateMonitoredSystemRequest,
    ) -> Result<MonitoredSystem, sqlx::Error> {
        let timer = QueryTimer::new("create_monitored_system");
        let result = sqlx::query_as::<_, MonitoredSystemEntity>(
            r#"
            INSERT INTO monitored_systems (name, system_type, branch_id, status, hostname,
                                           ip_address, cpu_usage, memory_usage, disk_usage,
                                           uptime_percentage, last_check, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), $11)
            RETURNING id, name, system_type, branch_id, status, hostname, ip_address,
                      cpu_usage, memory_usage, disk_usage, uptime_percentage, last_check,
                      description, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(request.system_type.to_string())
        .bind(request.branch_id)
        .bind(request.status.to_string())
        .bind(&request.hostname)
        .bind(&request.ip_address)
        .bind(request.cpu_usage)
        .bind(request.memory_usage)
        .bind(request.disk_usage)
        .bind(request.uptime_percentage)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a monitored system by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MonitoredSystem>, sqlx::Error> {
        let timer = QueryTimer::new("find_monitored_system_by_id");
        let result = sqlx::query_as::<_, MonitoredSystemEntity>(
            r#"
            SELECT id, name, system_type, branch_id, status, hostname, ip_address,
                   cpu_usage, memory_usage, disk_usage, uptime_percentage, last_check,
                   description, created_at, updated_at
            FROM monitored_systems
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(MonitoredSystem::from))
    }

    /// Partially update a monitored system and refresh `last_check`.
    /// An explicit null `branch_id` detaches the system.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateMonitoredSystemRequest,
    ) -> Result<Option<MonitoredSystem>, sqlx::Error> {
        let timer = QueryTimer::new("update_monitored_system");
        let set_branch = request.branch_id.is_some();
        let branch_value = request.branch_id.clone().flatten();
        let result = sqlx::query_as::<_, MonitoredSystemEntity>(
            r#"
            UPDATE monitored_systems
            SET
                name = COALESCE($2, name),
                system_type = COALESCE($3, system_type),
                branch_id = CASE WHEN $4::boolean THEN $5 ELSE branch_id END,
                status = COALESCE($6, status),
                hostname = COALESCE($7, hostname),
                ip_address = COALESCE($8, ip_address),
                cpu_usage = COALESCE($9, cpu_usage),
                memory_usage = COALESCE($10, memory_usage),
                disk_usage = COALESCE($11, disk_usage),
                uptime_percentage = COALESCE($12, uptime_percentage),
                description = COALESCE($13, description),
                last_check = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, system_type, branch_id, status, hostname, ip_address,
                      cpu_usage, memory_usage, disk_usage, uptime_percentage, last_check,
                      description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.system_type.map(|t| t.to_string()))
        .bind(set_branch)
        .bind(branch_value)
        .bind(request.status.map(|s| s.to_string()))
        .bind(&request.hostname)
        .bind(&request.ip_address)
        .bind(request.cpu_usage)
        .bind(request.memory_usage)
        .bind(request.disk_usage)
        .bind(request.uptime_percentage)
        .bind(&request.description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(MonitoredSystem::from))
    }

    /// Delete a monitored system. Nothing references systems, so no
    /// fan-out is needed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_monitored_system");
        let result = sqlx::query("DELETE FROM monitored_systems WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List monitored systems with pagination and filtering, name
    /// ascending.
    pub async fn list(
        &self,
        query: &ListMonitoredSystemsQuery,
    ) -> Result<(Vec<MonitoredSystem>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_monitored_systems");
        let params = PageParams::new(query.page, query.per_page);

        let filter = SystemFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!(
            "SELECT COUNT(*) FROM monitored_systems WHERE {}",
            where_clause
        );
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_system_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, name, system_type, branch_id, status, hostname, ip_address,
                   cpu_usage, memory_usage, disk_usage, uptime_percentage, last_check,
                   description, created_at, updated_at
            FROM monitored_systems
            WHERE {}
            ORDER BY name ASC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, MonitoredSystemEntity>(&list_query);
        let list_builder = bind_system_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((
            entities.into_iter().map(MonitoredSystem::from).collect(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::SystemStatus;

    #[test]
    fn test_filter_builder_all_filters() {
        let query = ListMonitoredSystemsQuery {
            search: Some("db".to_string()),
            status: Some(SystemStatus::Critical),
            branch_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let filter = SystemFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("hostname ILIKE $1"));
        assert!(clause.contains("status = $2"));
        assert!(clause.contains("branch_id = $3"));
        assert_eq!(filter.param_count(), 3);
    }
}
