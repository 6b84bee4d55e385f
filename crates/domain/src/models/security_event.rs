//! Security events and the shared severity scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Severity scale shared by security events and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventType {
    UnauthorizedAccess,
    Malware,
    Phishing,
    DataBreach,
    Fraud,
    CardSkimming,
    PolicyViolation,
    Other,
}

impl FromStr for SecurityEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNAUTHORIZED_ACCESS" => Ok(SecurityEventType::UnauthorizedAccess),
            "MALWARE" => Ok(SecurityEventType::Malware),
            "PHISHING" => Ok(SecurityEventType::Phishing),
            "DATA_BREACH" => Ok(SecurityEventType::DataBreach),
            "FRAUD" => Ok(SecurityEventType::Fraud),
            "CARD_SKIMMING" => Ok(SecurityEventType::CardSkimming),
            "POLICY_VIOLATION" => Ok(SecurityEventType::PolicyViolation),
            "OTHER" => Ok(SecurityEventType::Other),
            _ => Err(format!("Unknown security event type: {}", s)),
        }
    }
}

impl std::fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SecurityEventType::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            SecurityEventType::Malware => "MALWARE",
            SecurityEventType::Phishing => "PHISHING",
            SecurityEventType::DataBreach => "DATA_BREACH",
            SecurityEventType::Fraud => "FRAUD",
            SecurityEventType::CardSkimming => "CARD_SKIMMING",
            SecurityEventType::PolicyViolation => "POLICY_VIOLATION",
            SecurityEventType::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

/// Investigation states. Entering RESOLVED stamps `resolved_at` once;
/// moving back out does not clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventStatus {
    #[default]
    New,
    Investigating,
    Contained,
    Resolved,
    FalsePositive,
}

impl FromStr for SecurityEventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(SecurityEventStatus::New),
            "INVESTIGATING" => Ok(SecurityEventStatus::Investigating),
            "CONTAINED" => Ok(SecurityEventStatus::Contained),
            "RESOLVED" => Ok(SecurityEventStatus::Resolved),
            "FALSE_POSITIVE" => Ok(SecurityEventStatus::FalsePositive),
            _ => Err(format!("Unknown security event status: {}", s)),
        }
    }
}

impl std::fmt::Display for SecurityEventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SecurityEventStatus::New => "NEW",
            SecurityEventStatus::Investigating => "INVESTIGATING",
            SecurityEventStatus::Contained => "CONTAINED",
            SecurityEventStatus::Resolved => "RESOLVED",
            SecurityEventStatus::FalsePositive => "FALSE_POSITIVE",
        };
        write!(f, "{}", s)
    }
}

/// Security incident record. Visible only to administrators and
/// security officers.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub id: Uuid,
    pub event_type: SecurityEventType,
    pub severity: Severity,
    pub status: SecurityEventStatus,
    pub title: String,
    pub description: String,
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

/// Request to record a security event. `detected_at` defaults to the
/// time of recording when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSecurityEventRequest {
    pub event_type: SecurityEventType,

    #[serde(default)]
    pub severity: Severity,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub branch_id: Option<Uuid>,

    pub affected_user_id: Option<Uuid>,

    pub assigned_to: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub source_ip: Option<String>,

    pub detected_at: Option<DateTime<Utc>>,
}

/// Partial update of a security event. The nullable links accept
/// explicit null to detach.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSecurityEventRequest {
    pub event_type: Option<SecurityEventType>,

    pub severity: Option<Severity>,

    pub status: Option<SecurityEventStatus>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub branch_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub affected_user_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub assigned_to: Option<Option<Uuid>>,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub source_ip: Option<String>,

    #[validate(length(max = 5000))]
    pub resolution_notes: Option<String>,
}

/// Query parameters for listing security events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSecurityEventsQuery {
    pub search: Option<String>,
    pub status: Option<SecurityEventStatus>,
    pub severity: Option<Severity>,
    pub event_type: Option<SecurityEventType>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_security_enums_roundtrip() {
        for t in [
            SecurityEventType::UnauthorizedAccess,
            SecurityEventType::Malware,
            SecurityEventType::Phishing,
            SecurityEventType::DataBreach,
            SecurityEventType::Fraud,
            SecurityEventType::CardSkimming,
            SecurityEventType::PolicyViolation,
            SecurityEventType::Other,
        ] {
            assert_eq!(SecurityEventType::from_str(&t.to_string()).unwrap(), t);
        }
        for s in [
            SecurityEventStatus::New,
            SecurityEventStatus::Investigating,
            SecurityEventStatus::Contained,
            SecurityEventStatus::Resolved,
            SecurityEventStatus::FalsePositive,
        ] {
            assert_eq!(SecurityEventStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_create_request_rejects_bad_source_ip() {
        let request = CreateSecurityEventRequest {
            event_type: SecurityEventType::CardSkimming,
            severity: Severity::High,
            title: "Skimmer found on lobby ATM".to_string(),
            description: "Overlay device recovered during inspection.".to_string(),
            branch_id: Some(Uuid::new_v4()),
            affected_user_id: None,
            assigned_to: None,
            source_ip: Some("not-an-ip".to_string()),
            detected_at: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("source_ip"));
    }

    #[test]
    fn test_update_detaches_branch_via_null() {
        let patch: UpdateSecurityEventRequest =
            serde_json::from_str(r#"{"branch_id": null, "status": "CONTAINED"}"#).unwrap();
        assert_eq!(patch.branch_id, Some(None));
        assert_eq!(patch.status, Some(SecurityEventStatus::Contained));
        assert_eq!(patch.assigned_to, None);
    }
}
