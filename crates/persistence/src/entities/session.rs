//! Session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{User, UserRole};

/// Joined row returned by the token lookup: the session bookkeeping
/// columns plus the owning user. Expiry is checked in code so that
/// stale rows can be reaped lazily.
#[derive(Debug, Clone, FromRow)]
pub struct SessionUserEntity {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
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

impl SessionUserEntity {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: self.role.parse().unwrap_or(UserRole::Viewer),
            phone: self.phone,
            employee_id: self.employee_id,
            branch_id: self.branch_id,
            department: self.department,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expires_at: DateTime<Utc>) -> SessionUserEntity {
        SessionUserEntity {
            session_id: Uuid::new_v4(),
            expires_at,
            id: Uuid::new_v4(),
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: "Ops User".to_string(),
            role: "IT_OFFICER".to_string(),
            phone: None,
            employee_id: None,
            branch_id: None,
            department: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        assert!(sample(now - Duration::seconds(1)).is_expired(now));
        assert!(sample(now).is_expired(now));
        assert!(!sample(now + Duration::hours(8)).is_expired(now));
    }

    #[test]
    fn test_into_user_parses_role() {
        let now = Utc::now();
        let user = sample(now + Duration::hours(1)).into_user();
        assert_eq!(user.role, UserRole::ItOfficer);
    }
}
