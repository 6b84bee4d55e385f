//! Operator accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Operational roles, from widest to narrowest write surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    ItOfficer,
    SupportTech,
    BranchManager,
    SecurityOfficer,
    Viewer,
}

impl UserRole {
    /// All roles, in a stable order. Used by policy-table tests.
    pub const ALL: [UserRole; 6] = [
        UserRole::Admin,
        UserRole::ItOfficer,
        UserRole::SupportTech,
        UserRole::BranchManager,
        UserRole::SecurityOfficer,
        UserRole::Viewer,
    ];

    /// Human-readable label for descriptions and logs.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::ItOfficer => "IT Officer",
            UserRole::SupportTech => "Support Technician",
            UserRole::BranchManager => "Branch Manager",
            UserRole::SecurityOfficer => "Security Officer",
            UserRole::Viewer => "Viewer",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "IT_OFFICER" => Ok(UserRole::ItOfficer),
            "SUPPORT_TECH" => Ok(UserRole::SupportTech),
            "BRANCH_MANAGER" => Ok(UserRole::BranchManager),
            "SECURITY_OFFICER" => Ok(UserRole::SecurityOfficer),
            "VIEWER" => Ok(UserRole::Viewer),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => "ADMIN",
            UserRole::ItOfficer => "IT_OFFICER",
            UserRole::SupportTech => "SUPPORT_TECH",
            UserRole::BranchManager => "BRANCH_MANAGER",
            UserRole::SecurityOfficer => "SECURITY_OFFICER",
            UserRole::Viewer => "VIEWER",
        };
        write!(f, "{}", s)
    }
}

/// Operator account domain model.
///
/// `password_hash` never leaves the backend; API responses use
/// [`UserResponse`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub branch_id: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API-facing view of a user (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub employee_id: Option<String>,
    pub branch_id: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            phone: user.phone,
            employee_id: user.employee_id,
            branch_id: user.branch_id,
            department: user.department,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to create an operator account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 150))]
    pub full_name: String,

    pub role: UserRole,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_entity_code"))]
    pub employee_id: Option<String>,

    pub branch_id: Option<Uuid>,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update of an operator account. Absent fields keep their stored
/// values; `branch_id`/`employee_id` accept explicit null to clear.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 150))]
    pub full_name: Option<String>,

    pub role: Option<UserRole>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub employee_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub branch_id: Option<Option<Uuid>>,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    pub is_active: Option<bool>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub branch_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Credentials presented at login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_user_role_roundtrip() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_user_role_from_str_case_insensitive() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(
            UserRole::from_str("it_officer").unwrap(),
            UserRole::ItOfficer
        );
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[test]
    fn test_user_role_labels() {
        assert_eq!(UserRole::SupportTech.label(), "Support Technician");
        assert_eq!(UserRole::Viewer.label(), "Viewer");
    }

    #[test]
    fn test_create_user_request_validation() {
        let email: String = SafeEmail().fake();
        let request = CreateUserRequest {
            username: "ops.analyst".to_string(),
            email,
            password: "hunter2hunter2".to_string(),
            full_name: "Ops Analyst".to_string(),
            role: UserRole::Viewer,
            phone: Some("+1 555 010 9999".to_string()),
            employee_id: Some("EMP-1001".to_string()),
            branch_id: None,
            department: None,
            is_active: true,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_rejects_short_password() {
        let request = CreateUserRequest {
            username: "x1".to_string(), // also too short
            email: "nope".to_string(),
            password: "short".to_string(),
            full_name: String::new(),
            role: UserRole::Admin,
            phone: None,
            employee_id: None,
            branch_id: None,
            department: None,
            is_active: true,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_user_request_distinguishes_absent_from_null() {
        let absent: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.branch_id.is_none());

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"branch_id": null}"#).unwrap();
        assert_eq!(cleared.branch_id, Some(None));
    }
}
