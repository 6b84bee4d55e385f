//! Bank branches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchType {
    Main,
    Sub,
    Agency,
    Hq,
}

impl FromStr for BranchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MAIN" => Ok(BranchType::Main),
            "SUB" => Ok(BranchType::Sub),
            "AGENCY" => Ok(BranchType::Agency),
            "HQ" => Ok(BranchType::Hq),
            _ => Err(format!("Unknown branch type: {}", s)),
        }
    }
}

impl std::fmt::Display for BranchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BranchType::Main => "MAIN",
            BranchType::Sub => "SUB",
            BranchType::Agency => "AGENCY",
            BranchType::Hq => "HQ",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl FromStr for BranchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(BranchStatus::Active),
            "INACTIVE" => Ok(BranchStatus::Inactive),
            "MAINTENANCE" => Ok(BranchStatus::Maintenance),
            _ => Err(format!("Unknown branch status: {}", s)),
        }
    }
}

impl std::fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BranchStatus::Active => "ACTIVE",
            BranchStatus::Inactive => "INACTIVE",
            BranchStatus::Maintenance => "MAINTENANCE",
        };
        write!(f, "{}", s)
    }
}

/// Branch domain model.
#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub branch_type: BranchType,
    pub status: BranchStatus,
    pub region: String,
    pub city: String,
    pub address: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub manager_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a branch. `code` is immutable after creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(custom(function = "shared::validation::validate_entity_code"))]
    pub code: String,

    #[validate(length(min = 1, max = 150))]
    pub name: String,

    pub branch_type: BranchType,

    #[serde(default)]
    pub status: BranchStatus,

    #[validate(length(min = 1, max = 100))]
    pub region: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(length(max = 150))]
    pub manager_name: Option<String>,
}

/// Partial update of a branch. The branch code cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBranchRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,

    pub branch_type: Option<BranchType>,

    pub status: Option<BranchStatus>,

    #[validate(length(min = 1, max = 100))]
    pub region: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(length(max = 150))]
    pub manager_name: Option<String>,
}

/// Query parameters for listing branches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBranchesQuery {
    pub search: Option<String>,
    pub branch_type: Option<BranchType>,
    pub status: Option<BranchStatus>,
    pub region: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_enums_roundtrip() {
        for t in [
            BranchType::Main,
            BranchType::Sub,
            BranchType::Agency,
            BranchType::Hq,
        ] {
            assert_eq!(BranchType::from_str(&t.to_string()).unwrap(), t);
        }
        for s in [
            BranchStatus::Active,
            BranchStatus::Inactive,
            BranchStatus::Maintenance,
        ] {
            assert_eq!(BranchStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_branch_status_defaults_to_active() {
        assert_eq!(BranchStatus::default(), BranchStatus::Active);
    }

    #[test]
    fn test_create_branch_request_validation() {
        let request = CreateBranchRequest {
            code: "BR-001".to_string(),
            name: "Main Street Branch".to_string(),
            branch_type: BranchType::Main,
            status: BranchStatus::Active,
            region: "Central".to_string(),
            city: "Springfield".to_string(),
            address: "1 Main Street".to_string(),
            contact_phone: Some("+1 555 010 2000".to_string()),
            contact_email: Some("mainstreet@bank.example".to_string()),
            manager_name: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_branch_request_rejects_bad_code() {
        let request = CreateBranchRequest {
            code: "a branch code".to_string(),
            name: "X".to_string(),
            branch_type: BranchType::Sub,
            status: BranchStatus::Active,
            region: "R".to_string(),
            city: "C".to_string(),
            address: "A".to_string(),
            contact_phone: None,
            contact_email: None,
            manager_name: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }

    #[test]
    fn test_status_deserializes_from_screaming_snake() {
        let status: BranchStatus = serde_json::from_str(r#""MAINTENANCE""#).unwrap();
        assert_eq!(status, BranchStatus::Maintenance);
    }
}
