//! Monitored infrastructure (servers, network gear, applications).
//!
//! Readings are operator-entered; this system does not poll anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemType {
    Server,
    Database,
    Network,
    Application,
    Firewall,
    Storage,
}

impl FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SERVER" => Ok(SystemType::Server),
            "DATABASE" => Ok(SystemType::Database),
            "NETWORK" => Ok(SystemType::Network),
            "APPLICATION" => Ok(SystemType::Application),
            "FIREWALL" => Ok(SystemType::Firewall),
            "STORAGE" => Ok(SystemType::Storage),
            _ => Err(format!("Unknown system type: {}", s)),
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SystemType::Server => "SERVER",
            SystemType::Database => "DATABASE",
            SystemType::Network => "NETWORK",
            SystemType::Application => "APPLICATION",
            SystemType::Firewall => "FIREWALL",
            SystemType::Storage => "STORAGE",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    #[default]
    Operational,
    Warning,
    Critical,
    Down,
    Maintenance,
}

impl FromStr for SystemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPERATIONAL" => Ok(SystemStatus::Operational),
            "WARNING" => Ok(SystemStatus::Warning),
            "CRITICAL" => Ok(SystemStatus::Critical),
            "DOWN" => Ok(SystemStatus::Down),
            "MAINTENANCE" => Ok(SystemStatus::Maintenance),
            _ => Err(format!("Unknown system status: {}", s)),
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SystemStatus::Operational => "OPERATIONAL",
            SystemStatus::Warning => "WARNING",
            SystemStatus::Critical => "CRITICAL",
            SystemStatus::Down => "DOWN",
            SystemStatus::Maintenance => "MAINTENANCE",
        };
        write!(f, "{}", s)
    }
}

/// Monitored system domain model.
///
/// `last_check` is refreshed on every update, whatever fields changed.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoredSystem {
    pub id: Uuid,
    pub name: String,
    pub system_type: SystemType,
    pub branch_id: Option<Uuid>,
    pub status: SystemStatus,
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub uptime_percentage: f64,
    pub last_check: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a monitored system.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMonitoredSystemRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,

    pub system_type: SystemType,

    pub branch_id: Option<Uuid>,

    #[serde(default)]
    pub status: SystemStatus,

    #[validate(custom(function = "shared::validation::validate_hostname"))]
    pub hostname: Option<String>,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub ip_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    #[serde(default)]
    pub cpu_usage: f64,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    #[serde(default)]
    pub memory_usage: f64,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    #[serde(default)]
    pub disk_usage: f64,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    #[serde(default = "default_uptime")]
    pub uptime_percentage: f64,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

fn default_uptime() -> f64 {
    100.0
}

/// Partial update of a monitored system; always refreshes `last_check`.
/// `branch_id` accepts explicit null to detach.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMonitoredSystemRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,

    pub system_type: Option<SystemType>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub branch_id: Option<Option<Uuid>>,

    pub status: Option<SystemStatus>,

    #[validate(custom(function = "shared::validation::validate_hostname"))]
    pub hostname: Option<String>,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub ip_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub cpu_usage: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub memory_usage: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub disk_usage: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub uptime_percentage: Option<f64>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Query parameters for listing monitored systems.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMonitoredSystemsQuery {
    pub search: Option<String>,
    pub status: Option<SystemStatus>,
    pub system_type: Option<SystemType>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_enums_roundtrip() {
        for t in [
            SystemType::Server,
            SystemType::Database,
            SystemType::Network,
            SystemType::Application,
            SystemType::Firewall,
            SystemType::Storage,
        ] {
            assert_eq!(SystemType::from_str(&t.to_string()).unwrap(), t);
        }
        for s in [
            SystemStatus::Operational,
            SystemStatus::Warning,
            SystemStatus::Critical,
            SystemStatus::Down,
            SystemStatus::Maintenance,
        ] {
            assert_eq!(SystemStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_create_request_bounds_usage_percentages() {
        let request = CreateMonitoredSystemRequest {
            name: "core-db-01".to_string(),
            system_type: SystemType::Database,
            branch_id: None,
            status: SystemStatus::Operational,
            hostname: Some("core-db-01.bank.local".to_string()),
            ip_address: Some("10.0.4.8".to_string()),
            cpu_usage: 140.0,
            memory_usage: 55.0,
            disk_usage: -3.0,
            uptime_percentage: 99.99,
            description: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cpu_usage"));
        assert!(fields.contains_key("disk_usage"));
        assert!(!fields.contains_key("memory_usage"));
    }
}
