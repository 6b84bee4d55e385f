//! ATM entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Atm, AtmStatus, AtmType};

/// Database row mapping for the atms table.
#[derive(Debug, Clone, FromRow)]
pub struct AtmEntity {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub branch_id: Uuid,
    pub atm_type: String,
    pub status: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: String,
    pub ip_address: Option<String>,
    pub cash_level: i64,
    pub max_cash_capacity: i64,
    pub cash_currency: String,
    pub uptime_percentage: f64,
    pub installation_date: Option<NaiveDate>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AtmEntity> for Atm {
    fn from(entity: AtmEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            branch_id: entity.branch_id,
            atm_type: entity.atm_type.parse().unwrap_or(AtmType::Onsite),
            status: entity.status.parse().unwrap_or(AtmStatus::Online),
            manufacturer: entity.manufacturer,
            model: entity.model,
            serial_number: entity.serial_number,
            ip_address: entity.ip_address,
            cash_level: entity.cash_level,
            max_cash_capacity: entity.max_cash_capacity,
            cash_currency: entity.cash_currency,
            uptime_percentage: entity.uptime_percentage,
            installation_date: entity.installation_date,
            last_maintenance_date: entity.last_maintenance_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atm_entity_to_domain() {
        let entity = AtmEntity {
            id: Uuid::new_v4(),
            code: "ATM-001".to_string(),
            name: "Lobby left".to_string(),
            branch_id: Uuid::new_v4(),
            atm_type: "DRIVE_UP".to_string(),
            status: "CASH_DEPLETED".to_string(),
            manufacturer: Some("NCR".to_string()),
            model: None,
            serial_number: "SN-778812".to_string(),
            ip_address: Some("10.4.1.9".to_string()),
            cash_level: 5_000,
            max_cash_capacity: 100_000,
            cash_currency: "USD".to_string(),
            uptime_percentage: 98.7,
            installation_date: None,
            last_maintenance_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let atm: Atm = entity.into();
        assert_eq!(atm.atm_type, AtmType::DriveUp);
        assert_eq!(atm.status, AtmStatus::CashDepleted);
        assert_eq!(atm.cash_percentage(), 5.0);
    }
}
