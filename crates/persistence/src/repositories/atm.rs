//! ATM repository for database operations.
//!
//! List queries join the owning branch so searches can match the branch
//! name; every column is prefixed to keep the two tables apart.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Atm, CreateAtmRequest, ListAtmsQuery, UpdateAtmRequest};
use shared::pagination::PageParams;

use crate::entities::AtmEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from ATM filters.
struct AtmFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AtmFilterBuilder {
    fn build(query: &ListAtmsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(a.code ILIKE ${p} OR a.name ILIKE ${p} OR a.serial_number ILIKE ${p} \
                 OR b.name ILIKE ${p})",
                p = param_count
            ));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("a.status = ${}", param_count));
        }

        if query.atm_type.is_some() {
            param_count += 1;
            conditions.push(format!("a.atm_type = ${}", param_count));
        }

        if query.branch_id.is_some() {
            param_count += 1;
            conditions.push(format!("a.branch_id = ${}", param_count));
        }

        if query.cash_band.is_some() {
            param_count += 1;
            conditions.push(format!("a.cash_level < ${}", param_count));
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

/// Macro to bind ATM filter parameters to a SQLx builder, in the same
/// order the builder numbered them.
macro_rules! bind_atm_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref atm_type) = $query.atm_type {
            b = b.bind(atm_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        if let Some(ref cash_band) = $query.cash_band {
            b = b.bind(cash_band.threshold());
        }
        b
    }};
}

/// Repository for ATM database operations.
#[derive(Clone)]
pub struct AtmRepository {
    pool: PgPool,
}

impl AtmRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ATM.
    pub async fn create(&self, request: &CreateAtmRequest) -> Result<Atm, sqlx::Error> {
        let timer = QueryTimer::new("create_atm");
        let result = sqlx::query_as::<_, AtmEntity>(
            r#"
            INSERT INTO atms (code, name, branch_id, atm_type, status, manufacturer, model,
                              serial_number, ip_address, cash_level, max_cash_capacity,
                              cash_currency, uptime_percentage, installation_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, code, name, branch_id, atm_type, status, manufacturer, model,
                      serial_number, ip_address, cash_level, max_cash_capacity, cash_currency,
                      uptime_percentage, installation_date, last_maintenance_date,
                      created_at, updated_at
            "#,
        )
        .bind(&request.code)
        .bind(&request.name)
        .bind(request.branch_id)
        .bind(request.atm_type.to_string())
        .bind(request.status.to_string())
        .bind(&request.manufacturer)
        .bind(&request.model)
        .bind(&request.serial_number)
        .bind(&request.ip_address)
        .bind(request.cash_level)
        .bind(request.max_cash_capacity)
        .bind(&request.cash_currency)
        .bind(request.uptime_percentage)
        .bind(request.installation_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find an ATM by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Atm>, sqlx::Error> {
        let timer = QueryTimer::new("find_atm_by_id");
        let result = sqlx::query_as::<_, AtmEntity>(
            r#"
            SELECT id, code, name, branch_id, atm_type, status, manufacturer, model,
                   serial_number, ip_address, cash_level, max_cash_capacity, cash_currency,
                   uptime_percentage, installation_date, last_maintenance_date,
                   created_at, updated_at
            FROM atms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Atm::from))
    }

    /// Partially update an ATM. Code, serial number, owning branch and
    /// installation date are never touched.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateAtmRequest,
    ) -> Result<Option<Atm>, sqlx::Error> {
        let timer = QueryTimer::new("update_atm");
        let result = sqlx::query_as::<_, AtmEntity>(
            r#"
            UPDATE atms
            SET
                name = COALESCE($2, name),
                atm_type = COALESCE($3, atm_type),
                status = COALESCE($4, status),
                manufacturer = COALESCE($5, manufacturer),
                model = COALESCE($6, model),
                ip_address = COALESCE($7, ip_address),
                cash_level = COALESCE($8, cash_level),
                max_cash_capacity = COALESCE($9, max_cash_capacity),
                uptime_percentage = COALESCE($10, uptime_percentage),
                last_maintenance_date = COALESCE($11, last_maintenance_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, name, branch_id, atm_type, status, manufacturer, model,
                      serial_number, ip_address, cash_level, max_cash_capacity, cash_currency,
                      uptime_percentage, installation_date, last_maintenance_date,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.atm_type.map(|t| t.to_string()))
        .bind(request.status.map(|s| s.to_string()))
        .bind(&request.manufacturer)
        .bind(&request.model)
        .bind(&request.ip_address)
        .bind(request.cash_level)
        .bind(request.max_cash_capacity)
        .bind(request.uptime_percentage)
        .bind(request.last_maintenance_date)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Atm::from))
    }

    /// Delete an ATM; tickets and alerts that point at it are detached
    /// in the same transaction.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_atm");
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE support_tickets SET atm_id = NULL WHERE atm_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE alerts SET atm_id = NULL WHERE atm_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM atms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List ATMs with pagination and filtering, code ascending.
    pub async fn list(&self, query: &ListAtmsQuery) -> Result<(Vec<Atm>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_atms");
        let params = PageParams::new(query.page, query.per_page);

        let filter = AtmFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!(
            r#"
            SELECT COUNT(*)
            FROM atms a
            LEFT JOIN branches b ON b.id = a.branch_id
            WHERE {}
            "#,
            where_clause
        );
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_atm_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT a.id, a.code, a.name, a.branch_id, a.atm_type, a.status, a.manufacturer,
                   a.model, a.serial_number, a.ip_address, a.cash_level, a.max_cash_capacity,
                   a.cash_currency, a.uptime_percentage, a.installation_date,
                   a.last_maintenance_date, a.created_at, a.updated_at
            FROM atms a
            LEFT JOIN branches b ON b.id = a.branch_id
            WHERE {}
            ORDER BY a.code ASC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, AtmEntity>(&list_query);
        let list_builder = bind_atm_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((entities.into_iter().map(Atm::from).collect(), total))
    }

    /// Check whether an ATM code is already taken.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("atm_code_exists");
        let result =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM atms WHERE code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Check whether an ATM serial number is already registered.
    pub async fn serial_number_exists(&self, serial_number: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("atm_serial_number_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM atms WHERE serial_number = $1)",
        )
        .bind(serial_number)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::CashBand;

    #[test]
    fn test_filter_builder_prefixes_columns() {
        let query = ListAtmsQuery {
            search: Some("lobby".to_string()),
            branch_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let filter = AtmFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("a.code ILIKE $1"));
        assert!(clause.contains("b.name ILIKE $1"));
        assert!(clause.contains("a.branch_id = $2"));
    }

    #[test]
    fn test_filter_builder_cash_band_is_threshold_param() {
        let query = ListAtmsQuery {
            cash_band: Some(CashBand::Critical),
            ..Default::default()
        };
        let filter = AtmFilterBuilder::build(&query);
        assert_eq!(filter.where_clause(), "a.cash_level < $1");
        assert_eq!(filter.param_count(), 1);
    }
}
