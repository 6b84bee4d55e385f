//! Performance report repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    CreatePerformanceReportRequest, ListPerformanceReportsQuery, PerformanceReport,
    UpdatePerformanceReportRequest,
};
use shared::pagination::PageParams;

use crate::entities::PerformanceReportEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from list filters.
struct ReportFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl ReportFilterBuilder {
    fn build(query: &ListPerformanceReportsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(title ILIKE ${p} OR summary ILIKE ${p})",
                p = param_count
            ));
        }

        if query.report_type.is_some() {
            param_count += 1;
            conditions.push(format!("report_type = ${}", param_count));
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
macro_rules! bind_report_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref report_type) = $query.report_type {
            b = b.bind(report_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        b
    }};
}

/// Repository for performance report database operations.
#[derive(Clone)]
pub struct PerformanceReportRepository {
    pool: PgPool,
}

impl PerformanceReportRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new report. `generated_by` is the creating user.
    pub async fn create(
        &self,
        request: &CreatePerformanceReportRequest,
        generated_by: Option<Uuid>,
    ) -> Result<PerformanceReport, sqlx::Error> {
        let timer = QueryTimer::new("create_performance_report");
        let result = sqlx::query_as::<_, PerformanceReportEntity>(
            r#"
            INSERT INTO performance_reports (report_type, title, period_start, period_end,
                                             branch_id, total_tickets, resolved_tickets,
                                             avg_resolution_hours, atm_uptime_percentage,
                                             system_uptime_percentage, incident_count, summary,
                                             report_data, generated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, report_type, title, period_start, period_end, branch_id,
                      total_tickets, resolved_tickets, avg_resolution_hours,
                      atm_uptime_percentage, system_uptime_percentage, incident_count,
                      summary, report_data, generated_by, created_at, updated_at
            "#,
        )
        .bind(request.report_type.to_string())
        .bind(&request.title)
        .bind(request.period_start)
        .bind(request.period_end)
        .bind(request.branch_id)
        .bind(request.total_tickets)
        .bind(request.resolved_tickets)
        .bind(request.avg_resolution_hours)
        .bind(request.atm_uptime_percentage)
        .bind(request.system_uptime_percentage)
        .bind(request.incident_count)
        .bind(&request.summary)
        .bind(&request.report_data)
        .bind(generated_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PerformanceReport>, sqlx::Error> {
        let timer = QueryTimer::new("find_performance_report_by_id");
        let result = sqlx::query_as::<_, PerformanceReportEntity>(
            r#"
            SELECT id, report_type, title, period_start, period_end, branch_id,
                   total_tickets, resolved_tickets, avg_resolution_hours,
                   atm_uptime_percentage, system_uptime_percentage, incident_count,
                   summary, report_data, generated_by, created_at, updated_at
            FROM performance_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(PerformanceReport::from))
    }

    /// Partially update a report's figures. The covered period, type and
    /// branch are fixed at creation.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdatePerformanceReportRequest,
    ) -> Result<Option<PerformanceReport>, sqlx::Error> {
        let timer = QueryTimer::new("update_performance_report");
        let result = sqlx::query_as::<_, PerformanceReportEntity>(
            r#"
            UPDATE performance_reports
            SET
                title = COALESCE($2, title),
                total_tickets = COALESCE($3, total_tickets),
                resolved_tickets = COALESCE($4, resolved_tickets),
                avg_resolution_hours = COALESCE($5, avg_resolution_hours),
                atm_uptime_percentage = COALESCE($6, atm_uptime_percentage),
                system_uptime_percentage = COALESCE($7, system_uptime_percentage),
                incident_count = COALESCE($8, incident_count),
                summary = COALESCE($9, summary),
                report_data = COALESCE($10, report_data),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, report_type, title, period_start, period_end, branch_id,
                      total_tickets, resolved_tickets, avg_resolution_hours,
                      atm_uptime_percentage, system_uptime_percentage, incident_count,
                      summary, report_data, generated_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(request.total_tickets)
        .bind(request.resolved_tickets)
        .bind(request.avg_resolution_hours)
        .bind(request.atm_uptime_percentage)
        .bind(request.system_uptime_percentage)
        .bind(request.incident_count)
        .bind(&request.summary)
        .bind(&request.report_data)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(PerformanceReport::from))
    }

    /// Delete a report. Nothing references reports.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_performance_report");
        let result = sqlx::query("DELETE FROM performance_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List reports, most recent period first, with pagination and
    /// filtering.
    pub async fn list(
        &self,
        query: &ListPerformanceReportsQuery,
    ) -> Result<(Vec<PerformanceReport>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_performance_reports");
        let params = PageParams::new(query.page, query.per_page);

        let filter = ReportFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!(
            "SELECT COUNT(*) FROM performance_reports WHERE {}",
            where_clause
        );
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_report_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, report_type, title, period_start, period_end, branch_id,
                   total_tickets, resolved_tickets, avg_resolution_hours,
                   atm_uptime_percentage, system_uptime_percentage, incident_count,
                   summary, report_data, generated_by, created_at, updated_at
            FROM performance_reports
            WHERE {}
            ORDER BY period_start DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, PerformanceReportEntity>(&list_query);
        let list_builder = bind_report_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((
            entities.into_iter().map(PerformanceReport::from).collect(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ReportType;

    #[test]
    fn test_filter_numbering_is_sequential() {
        let query = ListPerformanceReportsQuery {
            search: Some("quarterly".to_string()),
            report_type: Some(ReportType::Quarterly),
            branch_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let filter = ReportFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("summary ILIKE $1"));
        assert!(clause.contains("report_type = $2"));
        assert!(clause.contains("branch_id = $3"));
        assert_eq!(filter.param_count(), 3);
    }
}
