//! Session repository for database operations.
//!
//! Only token hashes are stored. Expiry is enforced lazily: a lookup
//! that finds an expired row deletes it and reports no session, so a
//! periodic sweep is an optimization rather than a correctness need.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::User;

use crate::entities::SessionUserEntity;
use crate::metrics::QueryTimer;

/// Repository for session database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a session for a user. The token itself never reaches the
    /// database; callers hash it first.
    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a token hash to its user. An expired session is deleted on
    /// the spot and treated as absent.
    pub async fn find_user_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_user");
        let row = sqlx::query_as::<_, SessionUserEntity>(
            r#"
            SELECT s.id AS session_id, s.expires_at,
                   u.id, u.username, u.email, u.password_hash, u.full_name, u.role,
                   u.phone, u.employee_id, u.branch_id, u.department, u.is_active,
                   u.created_at, u.updated_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            timer.record();
            return Ok(None);
        };
        if row.is_expired(now) {
            sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(row.session_id)
                .execute(&self.pool)
                .await?;
            timer.record();
            return Ok(None);
        }

        timer.record();
        Ok(Some(row.into_user()))
    }

    /// Revoke the session behind a token hash, for logout.
    pub async fn revoke(&self, token_hash: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("revoke_session");
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session a user holds, for deactivation.
    pub async fn revoke_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("revoke_user_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Sweep out sessions that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
