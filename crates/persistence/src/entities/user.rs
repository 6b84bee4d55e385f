//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{User, UserRole};

/// Database row mapping for the users table. Includes the password hash;
/// conversion to API responses goes through [`domain::models::UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub branch_id: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            full_name: entity.full_name,
            // Least privilege when the stored code is unrecognized.
            role: entity.role.parse().unwrap_or(UserRole::Viewer),
            phone: entity.phone,
            employee_id: entity.employee_id,
            branch_id: entity.branch_id,
            department: entity.department,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity(role: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            username: "j.doe".to_string(),
            email: "j.doe@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: "Jordan Doe".to_string(),
            role: role.to_string(),
            phone: None,
            employee_id: Some("EMP-0042".to_string()),
            branch_id: None,
            department: Some("IT Operations".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_entity_to_domain() {
        let user: User = sample_entity("SECURITY_OFFICER").into();
        assert_eq!(user.role, UserRole::SecurityOfficer);
        assert_eq!(user.employee_id.as_deref(), Some("EMP-0042"));
    }

    #[test]
    fn test_unknown_role_falls_back_to_viewer() {
        let user: User = sample_entity("SUPERUSER").into();
        assert_eq!(user.role, UserRole::Viewer);
    }
}
