//! Monitored system entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{MonitoredSystem, SystemStatus, SystemType};

/// Database row mapping for the monitored_systems table.
#[derive(Debug, Clone, FromRow)]
pub struct MonitoredSystemEntity {
    pub id: Uuid,
    pub name: String,
    pub system_type: String,
    pub branch_id: Option<Uuid>,
    pub status: String,
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

impl From<MonitoredSystemEntity> for MonitoredSystem {
    fn from(entity: MonitoredSystemEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            system_type: entity.system_type.parse().unwrap_or(SystemType::Server),
            branch_id: entity.branch_id,
            status: entity.status.parse().unwrap_or(SystemStatus::Operational),
            hostname: entity.hostname,
            ip_address: entity.ip_address,
            cpu_usage: entity.cpu_usage,
            memory_usage: entity.memory_usage,
            disk_usage: entity.disk_usage,
            uptime_percentage: entity.uptime_percentage,
            last_check: entity.last_check,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(system_type: &str, status: &str) -> MonitoredSystemEntity {
        MonitoredSystemEntity {
            id: Uuid::new_v4(),
            name: "core-db-01".to_string(),
            system_type: system_type.to_string(),
            branch_id: None,
            status: status.to_string(),
            hostname: Some("core-db-01.bank.internal".to_string()),
            ip_address: Some("10.20.0.11".to_string()),
            cpu_usage: 91.5,
            memory_usage: 78.0,
            disk_usage: 40.2,
            uptime_percentage: 99.2,
            last_check: Utc::now(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_system_entity_to_domain() {
        let system: MonitoredSystem = sample("DATABASE", "WARNING").into();
        assert_eq!(system.system_type, SystemType::Database);
        assert_eq!(system.status, SystemStatus::Warning);
        assert_eq!(system.cpu_usage, 91.5);
    }

    #[test]
    fn test_unknown_type_falls_back_to_server() {
        let system: MonitoredSystem = sample("QUANTUM", "OPERATIONAL").into();
        assert_eq!(system.system_type, SystemType::Server);
    }
}
