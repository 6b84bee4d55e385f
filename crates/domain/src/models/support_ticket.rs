//! Support tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    Hardware,
    Software,
    Network,
    Atm,
    Pos,
    Security,
    Other,
}

impl FromStr for TicketCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HARDWARE" => Ok(TicketCategory::Hardware),
            "SOFTWARE" => Ok(TicketCategory::Software),
            "NETWORK" => Ok(TicketCategory::Network),
            "ATM" => Ok(TicketCategory::Atm),
            "POS" => Ok(TicketCategory::Pos),
            "SECURITY" => Ok(TicketCategory::Security),
            "OTHER" => Ok(TicketCategory::Other),
            _ => Err(format!("Unknown ticket category: {}", s)),
        }
    }
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketCategory::Hardware => "HARDWARE",
            TicketCategory::Software => "SOFTWARE",
            TicketCategory::Network => "NETWORK",
            TicketCategory::Atm => "ATM",
            TicketCategory::Pos => "POS",
            TicketCategory::Security => "SECURITY",
            TicketCategory::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(TicketPriority::Low),
            "MEDIUM" => Ok(TicketPriority::Medium),
            "HIGH" => Ok(TicketPriority::High),
            "CRITICAL" => Ok(TicketPriority::Critical),
            _ => Err(format!("Unknown ticket priority: {}", s)),
        }
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketPriority::Low => "LOW",
            TicketPriority::Medium => "MEDIUM",
            TicketPriority::High => "HIGH",
            TicketPriority::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

/// Ticket workflow states. The expected flow is OPEN → IN_PROGRESS or
/// PENDING → RESOLVED → CLOSED, with CANCELLED as an exit from anywhere;
/// transitions are not validated against this graph, but entering
/// RESOLVED/CLOSED has one-way timestamp side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Pending,
    Resolved,
    Closed,
    Cancelled,
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(TicketStatus::Open),
            "IN_PROGRESS" => Ok(TicketStatus::InProgress),
            "PENDING" => Ok(TicketStatus::Pending),
            "RESOLVED" => Ok(TicketStatus::Resolved),
            "CLOSED" => Ok(TicketStatus::Closed),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            _ => Err(format!("Unknown ticket status: {}", s)),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Pending => "PENDING",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Support ticket domain model.
///
/// `ticket_number`, `branch_id`, the ATM/POS links and `reported_by` are
/// fixed at creation. `resolved_at`, `closed_at` and `resolution_seconds`
/// are ratchet fields owned by the lifecycle engine.
#[derive(Debug, Clone, Serialize)]
pub struct SupportTicket {
    pub id: Uuid,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
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

/// Request to open a ticket. Tickets always start OPEN; the number is
/// assigned by the store.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupportTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub category: TicketCategory,

    #[serde(default)]
    pub priority: TicketPriority,

    pub branch_id: Uuid,

    pub atm_id: Option<Uuid>,

    pub pos_terminal_id: Option<Uuid>,

    pub assigned_to: Option<Uuid>,
}

/// Partial update of a ticket. `assigned_to` accepts explicit null to
/// put the ticket back in the unassigned pool.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSupportTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub category: Option<TicketCategory>,

    pub priority: Option<TicketPriority>,

    pub status: Option<TicketStatus>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub assigned_to: Option<Option<Uuid>>,

    #[validate(length(max = 5000))]
    pub resolution_notes: Option<String>,
}

/// Query parameters for listing tickets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSupportTicketsQuery {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub branch_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_enums_roundtrip() {
        for c in [
            TicketCategory::Hardware,
            TicketCategory::Software,
            TicketCategory::Network,
            TicketCategory::Atm,
            TicketCategory::Pos,
            TicketCategory::Security,
            TicketCategory::Other,
        ] {
            assert_eq!(TicketCategory::from_str(&c.to_string()).unwrap(), c);
        }
        for p in [
            TicketPriority::Low,
            TicketPriority::Medium,
            TicketPriority::High,
            TicketPriority::Critical,
        ] {
            assert_eq!(TicketPriority::from_str(&p.to_string()).unwrap(), p);
        }
        for s in [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Pending,
            TicketStatus::Resolved,
            TicketStatus::Closed,
            TicketStatus::Cancelled,
        ] {
            assert_eq!(TicketStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
    }

    #[test]
    fn test_create_request_requires_title_and_description() {
        let request = CreateSupportTicketRequest {
            title: String::new(),
            description: String::new(),
            category: TicketCategory::Atm,
            priority: TicketPriority::High,
            branch_id: Uuid::new_v4(),
            atm_id: None,
            pos_terminal_id: None,
            assigned_to: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_update_unassign_via_null() {
        let patch: UpdateSupportTicketRequest =
            serde_json::from_str(r#"{"assigned_to": null, "status": "IN_PROGRESS"}"#).unwrap();
        assert_eq!(patch.assigned_to, Some(None));
        assert_eq!(patch.status, Some(TicketStatus::InProgress));
    }
}
