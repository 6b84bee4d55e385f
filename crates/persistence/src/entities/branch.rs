//! Branch entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Branch, BranchStatus, BranchType};

/// Database row mapping for the branches table.
#[derive(Debug, Clone, FromRow)]
pub struct BranchEntity {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub branch_type: String,
    pub status: String,
    pub region: String,
    pub city: String,
    pub address: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub manager_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BranchEntity> for Branch {
    fn from(entity: BranchEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            branch_type: entity.branch_type.parse().unwrap_or(BranchType::Sub),
            status: entity.status.parse().unwrap_or(BranchStatus::Active),
            region: entity.region,
            city: entity.city,
            address: entity.address,
            contact_phone: entity.contact_phone,
            contact_email: entity.contact_email,
            manager_name: entity.manager_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_entity_to_domain() {
        let entity = BranchEntity {
            id: Uuid::new_v4(),
            code: "BR-014".to_string(),
            name: "Riverside Main".to_string(),
            branch_type: "MAIN".to_string(),
            status: "MAINTENANCE".to_string(),
            region: "North".to_string(),
            city: "Hillford".to_string(),
            address: "12 Quay Street".to_string(),
            contact_phone: None,
            contact_email: None,
            manager_name: Some("R. Ashworth".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let branch: Branch = entity.clone().into();
        assert_eq!(branch.code, "BR-014");
        assert_eq!(branch.branch_type, BranchType::Main);
        assert_eq!(branch.status, BranchStatus::Maintenance);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let entity = BranchEntity {
            id: Uuid::new_v4(),
            code: "BR-015".to_string(),
            name: "Legacy".to_string(),
            branch_type: "KIOSK".to_string(),
            status: "???".to_string(),
            region: "South".to_string(),
            city: "Marwick".to_string(),
            address: "4 Mill Lane".to_string(),
            contact_phone: None,
            contact_email: None,
            manager_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let branch: Branch = entity.into();
        assert_eq!(branch.branch_type, BranchType::Sub);
        assert_eq!(branch.status, BranchStatus::Active);
    }
}
