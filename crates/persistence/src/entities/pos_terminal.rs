//! POS terminal entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{PosStatus, PosTerminal, PosType};

/// Database row mapping for the pos_terminals table.
#[derive(Debug, Clone, FromRow)]
pub struct PosTerminalEntity {
    pub id: Uuid,
    pub terminal_id: String,
    pub merchant_name: String,
    pub branch_id: Option<Uuid>,
    pub pos_type: String,
    pub status: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: String,
    pub location_address: Option<String>,
    pub contact_phone: Option<String>,
    pub deployment_date: Option<NaiveDate>,
    pub last_transaction_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PosTerminalEntity> for PosTerminal {
    fn from(entity: PosTerminalEntity) -> Self {
        Self {
            id: entity.id,
            terminal_id: entity.terminal_id,
            merchant_name: entity.merchant_name,
            branch_id: entity.branch_id,
            pos_type: entity.pos_type.parse().unwrap_or(PosType::Countertop),
            status: entity.status.parse().unwrap_or(PosStatus::Active),
            manufacturer: entity.manufacturer,
            model: entity.model,
            serial_number: entity.serial_number,
            location_address: entity.location_address,
            contact_phone: entity.contact_phone,
            deployment_date: entity.deployment_date,
            last_transaction_at: entity.last_transaction_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_entity_to_domain() {
        let entity = PosTerminalEntity {
            id: Uuid::new_v4(),
            terminal_id: "POS-3301".to_string(),
            merchant_name: "Corner Grocer".to_string(),
            branch_id: None,
            pos_type: "PORTABLE".to_string(),
            status: "FAULTY".to_string(),
            manufacturer: None,
            model: None,
            serial_number: "PSN-99017".to_string(),
            location_address: None,
            contact_phone: None,
            deployment_date: None,
            last_transaction_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let pos: PosTerminal = entity.into();
        assert_eq!(pos.pos_type, PosType::Portable);
        assert_eq!(pos.status, PosStatus::Faulty);
        assert!(pos.branch_id.is_none());
    }
}
