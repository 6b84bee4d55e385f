//! Ticket comment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::TicketComment;

/// Database row mapping for the ticket_comments table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketCommentEntity {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Option<Uuid>,
    pub comment: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TicketCommentEntity> for TicketComment {
    fn from(entity: TicketCommentEntity) -> Self {
        Self {
            id: entity.id,
            ticket_id: entity.ticket_id,
            author_id: entity.author_id,
            comment: entity.comment,
            is_internal: entity.is_internal,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_entity_to_domain() {
        let ticket_id = Uuid::new_v4();
        let entity = TicketCommentEntity {
            id: Uuid::new_v4(),
            ticket_id,
            author_id: None,
            comment: "Replaced the card reader, monitoring overnight".to_string(),
            is_internal: true,
            created_at: Utc::now(),
        };

        let comment: TicketComment = entity.into();
        assert_eq!(comment.ticket_id, ticket_id);
        assert!(comment.is_internal);
        assert!(comment.author_id.is_none());
    }
}
