//! Support ticket entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{SupportTicket, TicketCategory, TicketPriority, TicketStatus};

/// Database row mapping for the support_tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct SupportTicketEntity {
    pub id: Uuid,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub branch_id: Uuid,
    pub atm_id: Option<Uuid>,
    pub pos_terminal_id: Option<Uuid>,
    pub reported_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub resolution_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SupportTicketEntity> for SupportTicket {
    fn from(entity: SupportTicketEntity) -> Self {
        Self {
            id: entity.id,
            ticket_number: entity.ticket_number,
            title: entity.title,
            description: entity.description,
            category: entity.category.parse().unwrap_or(TicketCategory::Other),
            priority: entity.priority.parse().unwrap_or(TicketPriority::Medium),
            status: entity.status.parse().unwrap_or(TicketStatus::Open),
            branch_id: entity.branch_id,
            atm_id: entity.atm_id,
            pos_terminal_id: entity.pos_terminal_id,
            reported_by: entity.reported_by,
            assigned_to: entity.assigned_to,
            resolution_notes: entity.resolution_notes,
            resolved_at: entity.resolved_at,
            closed_at: entity.closed_at,
            resolution_seconds: entity.resolution_seconds,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_entity_to_domain() {
        let branch_id = Uuid::new_v4();
        let entity = SupportTicketEntity {
            id: Uuid::new_v4(),
            ticket_number: "TKT-000042".to_string(),
            title: "ATM card reader jammed".to_string(),
            description: "Reader rejects all cards since this morning".to_string(),
            category: "ATM".to_string(),
            priority: "HIGH".to_string(),
            status: "IN_PROGRESS".to_string(),
            branch_id,
            atm_id: Some(Uuid::new_v4()),
            pos_terminal_id: None,
            reported_by: Some(Uuid::new_v4()),
            assigned_to: None,
            resolution_notes: None,
            resolved_at: None,
            closed_at: None,
            resolution_seconds: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let ticket: SupportTicket = entity.into();
        assert_eq!(ticket.ticket_number, "TKT-000042");
        assert_eq!(ticket.category, TicketCategory::Atm);
        assert_eq!(ticket.priority, TicketPriority::High);
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.branch_id, branch_id);
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        let entity = SupportTicketEntity {
            id: Uuid::new_v4(),
            ticket_number: "TKT-000001".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            category: "TELEPATHY".to_string(),
            priority: "MEDIUM".to_string(),
            status: "OPEN".to_string(),
            branch_id: Uuid::new_v4(),
            atm_id: None,
            pos_terminal_id: None,
            reported_by: None,
            assigned_to: None,
            resolution_notes: None,
            resolved_at: None,
            closed_at: None,
            resolution_seconds: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let ticket: SupportTicket = entity.into();
        assert_eq!(ticket.category, TicketCategory::Other);
    }
}
