//! Operational alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::security_event::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    SystemDown,
    AtmLowCash,
    AtmOffline,
    PosFault,
    NetworkIssue,
    Security,
    Performance,
    MaintenanceDue,
    Other,
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SYSTEM_DOWN" => Ok(AlertType::SystemDown),
            "ATM_LOW_CASH" => Ok(AlertType::AtmLowCash),
            "ATM_OFFLINE" => Ok(AlertType::AtmOffline),
            "POS_FAULT" => Ok(AlertType::PosFault),
            "NETWORK_ISSUE" => Ok(AlertType::NetworkIssue),
            "SECURITY" => Ok(AlertType::Security),
            "PERFORMANCE" => Ok(AlertType::Performance),
            "MAINTENANCE_DUE" => Ok(AlertType::MaintenanceDue),
            "OTHER" => Ok(AlertType::Other),
            _ => Err(format!("Unknown alert type: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlertType::SystemDown => "SYSTEM_DOWN",
            AlertType::AtmLowCash => "ATM_LOW_CASH",
            AlertType::AtmOffline => "ATM_OFFLINE",
            AlertType::PosFault => "POS_FAULT",
            AlertType::NetworkIssue => "NETWORK_ISSUE",
            AlertType::Security => "SECURITY",
            AlertType::Performance => "PERFORMANCE",
            AlertType::MaintenanceDue => "MAINTENANCE_DUE",
            AlertType::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

/// Alert handling states. ACKNOWLEDGED and RESOLVED carry one-way
/// timestamp side effects; DISMISSED carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(AlertStatus::Active),
            "ACKNOWLEDGED" => Ok(AlertStatus::Acknowledged),
            "RESOLVED" => Ok(AlertStatus::Resolved),
            "DISMISSED" => Ok(AlertStatus::Dismissed),
            _ => Err(format!("Unknown alert status: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlertStatus::Active => "ACTIVE",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::Dismissed => "DISMISSED",
        };
        write!(f, "{}", s)
    }
}

/// Operational alert. The ATM/POS/security-event links are fixed at
/// creation; `acknowledged_by`, `acknowledged_at` and `resolved_at` are
/// ratchet fields owned by the lifecycle engine.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub status: AlertStatus,
    pub title: String,
    pub message: String,
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

/// Request to raise an alert. Alerts always start ACTIVE.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAlertRequest {
    pub alert_type: AlertType,

    #[serde(default)]
    pub severity: Severity,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    pub branch_id: Option<Uuid>,

    pub atm_id: Option<Uuid>,

    pub pos_terminal_id: Option<Uuid>,

    pub security_event_id: Option<Uuid>,
}

/// Partial update of an alert. Only the text, severity and status can
/// change; the links are set at creation and cleared by the store when
/// their targets are deleted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAlertRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,

    pub severity: Option<Severity>,

    pub status: Option<AlertStatus>,
}

/// Query parameters for listing alerts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAlertsQuery {
    pub search: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    pub alert_type: Option<AlertType>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_enums_roundtrip() {
        for t in [
            AlertType::SystemDown,
            AlertType::AtmLowCash,
            AlertType::AtmOffline,
            AlertType::PosFault,
            AlertType::NetworkIssue,
            AlertType::Security,
            AlertType::Performance,
            AlertType::MaintenanceDue,
            AlertType::Other,
        ] {
            assert_eq!(AlertType::from_str(&t.to_string()).unwrap(), t);
        }
        for s in [
            AlertStatus::Active,
            AlertStatus::Acknowledged,
            AlertStatus::Resolved,
            AlertStatus::Dismissed,
        ] {
            assert_eq!(AlertStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_status_defaults_to_active() {
        assert_eq!(AlertStatus::default(), AlertStatus::Active);
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateAlertRequest {
            alert_type: AlertType::AtmLowCash,
            severity: Severity::High,
            title: "ATM-0042 below cash floor".to_string(),
            message: "Cash level 8,500 under critical threshold 10,000.".to_string(),
            branch_id: Some(Uuid::new_v4()),
            atm_id: Some(Uuid::new_v4()),
            pos_terminal_id: None,
            security_event_id: None,
        };
        assert!(request.validate().is_ok());

        let empty = CreateAlertRequest {
            title: String::new(),
            ..request
        };
        assert!(empty.validate().is_err());
    }
}
