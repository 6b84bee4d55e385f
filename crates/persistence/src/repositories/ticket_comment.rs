//! Ticket comment repository for database operations.
//!
//! Comments are immutable once written; there is no update path.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{CreateTicketCommentRequest, TicketComment};

use crate::entities::TicketCommentEntity;
use crate::metrics::QueryTimer;

/// Repository for ticket comment database operations.
#[derive(Clone)]
pub struct TicketCommentRepository {
    pool: PgPool,
}

impl TicketCommentRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a comment on a ticket. `author_id` is the commenting user.
    pub async fn create(
        &self,
        ticket_id: Uuid,
        author_id: Option<Uuid>,
        request: &CreateTicketCommentRequest,
    ) -> Result<TicketComment, sqlx::Error> {
        let timer = QueryTimer::new("create_ticket_comment");
        let result = sqlx::query_as::<_, TicketCommentEntity>(
            r#"
            INSERT INTO ticket_comments (ticket_id, author_id, comment, is_internal)
            VALUES ($1, $2, $3, $4)
            RETURNING id, ticket_id, author_id, comment, is_internal, created_at
            "#,
        )
        .bind(ticket_id)
        .bind(author_id)
        .bind(&request.comment)
        .bind(request.is_internal)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TicketComment>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_comment_by_id");
        let result = sqlx::query_as::<_, TicketCommentEntity>(
            r#"
            SELECT id, ticket_id, author_id, comment, is_internal, created_at
            FROM ticket_comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(TicketComment::from))
    }

    /// List a ticket's comments in conversation order. Internal comments
    /// are filtered out unless the caller may see them.
    pub async fn list_for_ticket(
        &self,
        ticket_id: Uuid,
        include_internal: bool,
    ) -> Result<Vec<TicketComment>, sqlx::Error> {
        let timer = QueryTimer::new("list_ticket_comments");
        let result = sqlx::query_as::<_, TicketCommentEntity>(
            r#"
            SELECT id, ticket_id, author_id, comment, is_internal, created_at
            FROM ticket_comments
            WHERE ticket_id = $1 AND (is_internal = FALSE OR $2::boolean)
            ORDER BY created_at ASC
            "#,
        )
        .bind(ticket_id)
        .bind(include_internal)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(TicketComment::from).collect())
    }

    /// Delete a comment.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_ticket_comment");
        let result = sqlx::query("DELETE FROM ticket_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
