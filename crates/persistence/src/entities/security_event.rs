//! Security event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{SecurityEvent, SecurityEventStatus, SecurityEventType, Severity};

/// Database row mapping for the security_events table.
#[derive(Debug, Clone, FromRow)]
pub struct SecurityEventEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub severity: String,
    pub status: String,
    pub branch_id: Option<Uuid>,
    pub affected_user_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub source_ip: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SecurityEventEntity> for SecurityEvent {
    fn from(entity: SecurityEventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            event_type: entity
                .event_type
                .parse()
                .unwrap_or(SecurityEventType::Other),
            severity: entity.severity.parse().unwrap_or(Severity::Medium),
            status: entity.status.parse().unwrap_or(SecurityEventStatus::New),
            branch_id: entity.branch_id,
            affected_user_id: entity.affected_user_id,
            assigned_to: entity.assigned_to,
            source_ip: entity.source_ip,
            detected_at: entity.detected_at,
            resolved_at: entity.resolved_at,
            resolution_notes: entity.resolution_notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_entity_to_domain() {
        let entity = SecurityEventEntity {
            id: Uuid::new_v4(),
            title: "Skimmer found on lobby ATM".to_string(),
            description: "Overlay device recovered during inspection".to_string(),
            event_type: "CARD_SKIMMING".to_string(),
            severity: "CRITICAL".to_string(),
            status: "INVESTIGATING".to_string(),
            branch_id: Some(Uuid::new_v4()),
            affected_user_id: None,
            assigned_to: None,
            source_ip: None,
            detected_at: Utc::now(),
            resolved_at: None,
            resolution_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let event: SecurityEvent = entity.into();
        assert_eq!(event.event_type, SecurityEventType::CardSkimming);
        assert_eq!(event.severity, Severity::Critical);
        assert_eq!(event.status, SecurityEventStatus::Investigating);
    }

    #[test]
    fn test_unknown_severity_falls_back_to_medium() {
        let entity = SecurityEventEntity {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            event_type: "OTHER".to_string(),
            severity: "APOCALYPTIC".to_string(),
            status: "NEW".to_string(),
            branch_id: None,
            affected_user_id: None,
            assigned_to: None,
            source_ip: None,
            detected_at: Utc::now(),
            resolved_at: None,
            resolution_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let event: SecurityEvent = entity.into();
        assert_eq!(event.severity, Severity::Medium);
    }
}
