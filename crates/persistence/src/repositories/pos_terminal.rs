//! POS terminal repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    CreatePosTerminalRequest, ListPosTerminalsQuery, PosTerminal, UpdatePosTerminalRequest,
};
use shared::pagination::PageParams;

use crate::entities::PosTerminalEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from POS filters.
struct PosFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl PosFilterBuilder {
    fn build(query: &ListPosTerminalsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(terminal_id ILIKE ${p} OR merchant_name ILIKE ${p} OR serial_number ILIKE ${p})",
                p = param_count
            ));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.pos_type.is_some() {
            param_count += 1;
            conditions.push(format!("pos_type = ${}", param_count));
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

/// Macro to bind POS filter parameters to a SQLx builder, in the same
/// order the builder numbered them.
macro_rules! bind_pos_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref search) = $query.search {
            b = b.bind(format!("%{}%", search));
        }
        if let Some(ref status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(ref pos_type) = $query.pos_type {
            b = b.bind(pos_type.to_string());
        }
        if let Some(ref branch_id) = $query.branch_id {
            b = b.bind(branch_id);
        }
        b
    }};
}

/// Repository for POS terminal database operations.
#[derive(Clone)]
pub struct PosTerminalRepository {
    pool: PgPool,
}

impl PosTerminalRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new POS terminal.
    pub async fn create(
        &self,
        request: &CreatePosTerminalRequest,
    ) -> Result<PosTerminal, sqlx::Error> {
        let timer = QueryTimer::new("create_pos_terminal");
        let result = sqlx::query_as::<_, PosTerminalEntity>(
            r#"
            INSERT INTO pos_terminals (terminal_id, merchant_name, branch_id, pos_type, status,
                                       manufacturer, model, serial_number, location_address,
                                       contact_phone, deployment_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, terminal_id, merchant_name, branch_id, pos_type, status, manufacturer,
                      model, serial_number, location_address, contact_phone, deployment_date,
                      last_transaction_at, created_at, updated_at
            "#,
        )
        .bind(&request.terminal_id)
        .bind(&request.merchant_name)
        .bind(request.branch_id)
        .bind(request.pos_type.to_string())
        .bind(request.status.to_string())
        .bind(&request.manufacturer)
        .bind(&request.model)
        .bind(&request.serial_number)
        .bind(&request.location_address)
        .bind(&request.contact_phone)
        .bind(request.deployment_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a POS terminal by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PosTerminal>, sqlx::Error> {
        let timer = QueryTimer::new("find_pos_terminal_by_id");
        let result = sqlx::query_as::<_, PosTerminalEntity>(
            r#"
            SELECT id, terminal_id, merchant_name, branch_id, pos_type, status, manufacturer,
                   model, serial_number, location_address, contact_phone, deployment_date,
                   last_transaction_at, created_at, updated_at
            FROM pos_terminals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(PosTerminal::from))
    }

    /// Partially update a POS terminal. An explicit null `branch_id`
    /// detaches the terminal; terminal id, serial number and deployment
    /// date are never touched.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdatePosTerminalRequest,
    ) -> Result<Option<PosTerminal>, sqlx::Error> {
        let timer = QueryTimer::new("update_pos_terminal");
        let set_branch = request.branch_id.is_some();
        let branch_value = request.branch_id.clone().flatten();
        let result = sqlx::query_as::<_, PosTerminalEntity>(
            r#"
            UPDATE pos_terminals
            SET
                merchant_name = COALESCE($2, merchant_name),
                branch_id = CASE WHEN $3::boolean THEN $4 ELSE branch_id END,
                pos_type = COALESCE($5, pos_type),
                status = COALESCE($6, status),
                manufacturer = COALESCE($7, manufacturer),
                model = COALESCE($8, model),
                location_address = COALESCE($9, location_address),
                contact_phone = COALESCE($10, contact_phone),
                last_transaction_at = COALESCE($11, last_transaction_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, terminal_id, merchant_name, branch_id, pos_type, status, manufacturer,
                      model, serial_number, location_address, contact_phone, deployment_date,
                      last_transaction_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.merchant_name)
        .bind(set_branch)
        .bind(branch_value)
        .bind(request.pos_type.map(|t| t.to_string()))
        .bind(request.status.map(|s| s.to_string()))
        .bind(&request.manufacturer)
        .bind(&request.model)
        .bind(&request.location_address)
        .bind(&request.contact_phone)
        .bind(request.last_transaction_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(PosTerminal::from))
    }

    /// Delete a POS terminal; tickets and alerts that point at it are
    /// detached in the same transaction.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_pos_terminal");
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE support_tickets SET pos_terminal_id = NULL WHERE pos_terminal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE alerts SET pos_terminal_id = NULL WHERE pos_terminal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM pos_terminals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// List POS terminals with pagination and filtering, terminal id
    /// ascending.
    pub async fn list(
        &self,
        query: &ListPosTerminalsQuery,
    ) -> Result<(Vec<PosTerminal>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_pos_terminals");
        let params = PageParams::new(query.page, query.per_page);

        let filter = PosFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM pos_terminals WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_pos_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT id, terminal_id, merchant_name, branch_id, pos_type, status, manufacturer,
                   model, serial_number, location_address, contact_phone, deployment_date,
                   last_transaction_at, created_at, updated_at
            FROM pos_terminals
            WHERE {}
            ORDER BY terminal_id ASC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );
        let list_builder = sqlx::query_as::<_, PosTerminalEntity>(&list_query);
        let list_builder = bind_pos_filters!(list_builder, query);
        let entities = list_builder
            .bind(params.per_page())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((entities.into_iter().map(PosTerminal::from).collect(), total))
    }

    /// Check whether a terminal id is already taken.
    pub async fn terminal_id_exists(&self, terminal_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("pos_terminal_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pos_terminals WHERE terminal_id = $1)",
        )
        .bind(terminal_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a POS serial number is already registered.
    pub async fn serial_number_exists(&self, serial_number: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("pos_serial_number_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pos_terminals WHERE serial_number = $1)",
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
    use domain::models::PosStatus;

    #[test]
    fn test_filter_builder_search_and_status() {
        let query = ListPosTerminalsQuery {
            search: Some("grocer".to_string()),
            status: Some(PosStatus::Faulty),
            ..Default::default()
        };
        let filter = PosFilterBuilder::build(&query);
        let clause = filter.where_clause();
        assert!(clause.contains("merchant_name ILIKE $1"));
        assert!(clause.contains("status = $2"));
        assert_eq!(filter.param_count(), 2);
    }
}
