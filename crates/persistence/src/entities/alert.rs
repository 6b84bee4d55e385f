//! Alert entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Alert, AlertStatus, AlertType, Severity};

/// Database row mapping for the alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub alert_type: String,
    pub severity: String,
    pub status: String,
    pub branch_id: Option<Uuid>,
    pub atm_id: Option<Uuid>,
    pub pos_terminal_id: Option<Uuid>,
    pub security_event_id: Option<Uuid>,
    pub acknowledged_by: Option<Uuid>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AlertEntity> for Alert {
    fn from(entity: AlertEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            message: entity.message,
            alert_type: entity.alert_type.parse().unwrap_or(AlertType::Other),
            severity: entity.severity.parse().unwrap_or(Severity::Medium),
            status: entity.status.parse().unwrap_or(AlertStatus::Active),
            branch_id: entity.branch_id,
            atm_id: entity.atm_id,
            pos_terminal_id: entity.pos_terminal_id,
            security_event_id: entity.security_event_id,
            acknowledged_by: entity.acknowledged_by,
            acknowledged_at: entity.acknowledged_at,
            resolved_at: entity.resolved_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_entity_to_domain() {
        let acked_by = Uuid::new_v4();
        let entity = AlertEntity {
            id: Uuid::new_v4(),
            title: "ATM cash below threshold".to_string(),
            message: "ATM-0042 cash level at 8%".to_string(),
            alert_type: "ATM_LOW_CASH".to_string(),
            severity: "HIGH".to_string(),
            status: "ACKNOWLEDGED".to_string(),
            branch_id: Some(Uuid::new_v4()),
            atm_id: Some(Uuid::new_v4()),
            pos_terminal_id: None,
            security_event_id: None,
            acknowledged_by: Some(acked_by),
            acknowledged_at: Some(Utc::now()),
            resolved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let alert: Alert = entity.into();
        assert_eq!(alert.alert_type, AlertType::AtmLowCash);
        assert_eq!(alert.status, AlertStatus::Acknowledged);
        assert_eq!(alert.acknowledged_by, Some(acked_by));
    }
}
