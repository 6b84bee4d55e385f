//! Comments attached to support tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single comment on a ticket. Comments are create-and-delete only;
/// there is no edit surface. Internal comments are hidden from
/// branch managers and viewers.
#[derive(Debug, Clone, Serialize)]
pub struct TicketComment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Option<Uuid>,
    pub comment: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to add a comment to a ticket. The ticket id comes from the
/// URL path and the author from the session.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTicketCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,

    #[serde(default)]
    pub is_internal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_internal_defaults_to_false() {
        let request: CreateTicketCommentRequest =
            serde_json::from_str(r#"{"comment": "Swapped the receipt printer."}"#).unwrap();
        assert!(!request.is_internal);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_comment_rejected() {
        let request = CreateTicketCommentRequest {
            comment: String::new(),
            is_internal: true,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("comment"));
    }
}
