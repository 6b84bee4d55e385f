//! Merchant POS terminals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosType {
    Countertop,
    Portable,
    Mobile,
    Integrated,
}

impl FromStr for PosType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COUNTERTOP" => Ok(PosType::Countertop),
            "PORTABLE" => Ok(PosType::Portable),
            "MOBILE" => Ok(PosType::Mobile),
            "INTEGRATED" => Ok(PosType::Integrated),
            _ => Err(format!("Unknown POS terminal type: {}", s)),
        }
    }
}

impl std::fmt::Display for PosType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PosType::Countertop => "COUNTERTOP",
            PosType::Portable => "PORTABLE",
            PosType::Mobile => "MOBILE",
            PosType::Integrated => "INTEGRATED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosStatus {
    #[default]
    Active,
    Inactive,
    Faulty,
    Maintenance,
}

impl FromStr for PosStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(PosStatus::Active),
            "INACTIVE" => Ok(PosStatus::Inactive),
            "FAULTY" => Ok(PosStatus::Faulty),
            "MAINTENANCE" => Ok(PosStatus::Maintenance),
            _ => Err(format!("Unknown POS terminal status: {}", s)),
        }
    }
}

impl std::fmt::Display for PosStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PosStatus::Active => "ACTIVE",
            PosStatus::Inactive => "INACTIVE",
            PosStatus::Faulty => "FAULTY",
            PosStatus::Maintenance => "MAINTENANCE",
        };
        write!(f, "{}", s)
    }
}

/// POS terminal domain model.
///
/// Terminals can outlive their branch (branch deletion clears the link).
#[derive(Debug, Clone, Serialize)]
pub struct PosTerminal {
    pub id: Uuid,
    pub terminal_id: String,
    pub merchant_name: String,
    pub branch_id: Option<Uuid>,
    pub pos_type: PosType,
    pub status: PosStatus,
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

/// Request to register a POS terminal. `terminal_id`, `serial_number` and
/// `deployment_date` are immutable after creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePosTerminalRequest {
    #[validate(custom(function = "shared::validation::validate_entity_code"))]
    pub terminal_id: String,

    #[validate(length(min = 1, max = 150))]
    pub merchant_name: String,

    pub branch_id: Option<Uuid>,

    pub pos_type: PosType,

    #[serde(default)]
    pub status: PosStatus,

    #[validate(length(max = 100))]
    pub manufacturer: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,

    #[validate(length(max = 255))]
    pub location_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,

    pub deployment_date: Option<NaiveDate>,
}

/// Partial update of a POS terminal. `branch_id` accepts explicit null to
/// detach the terminal from its branch.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePosTerminalRequest {
    #[validate(length(min = 1, max = 150))]
    pub merchant_name: Option<String>,

    #[serde(default, deserialize_with = "super::patch::double_option")]
    pub branch_id: Option<Option<Uuid>>,

    pub pos_type: Option<PosType>,

    pub status: Option<PosStatus>,

    #[validate(length(max = 100))]
    pub manufacturer: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(max = 255))]
    pub location_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub contact_phone: Option<String>,

    pub last_transaction_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing POS terminals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPosTerminalsQuery {
    pub search: Option<String>,
    pub status: Option<PosStatus>,
    pub pos_type: Option<PosType>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_enums_roundtrip() {
        for t in [
            PosType::Countertop,
            PosType::Portable,
            PosType::Mobile,
            PosType::Integrated,
        ] {
            assert_eq!(PosType::from_str(&t.to_string()).unwrap(), t);
        }
        for s in [
            PosStatus::Active,
            PosStatus::Inactive,
            PosStatus::Faulty,
            PosStatus::Maintenance,
        ] {
            assert_eq!(PosStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_create_pos_terminal_request_validation() {
        let request = CreatePosTerminalRequest {
            terminal_id: "POS-1204".to_string(),
            merchant_name: "Corner Grocers".to_string(),
            branch_id: Some(Uuid::new_v4()),
            pos_type: PosType::Countertop,
            status: PosStatus::Active,
            manufacturer: Some("Ingenico".to_string()),
            model: None,
            serial_number: "ING-7781".to_string(),
            location_address: Some("22 Market Lane".to_string()),
            contact_phone: Some("0712-345-678".to_string()),
            deployment_date: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_detach_branch() {
        let patch: UpdatePosTerminalRequest =
            serde_json::from_str(r#"{"branch_id": null}"#).unwrap();
        assert_eq!(patch.branch_id, Some(None));
        let untouched: UpdatePosTerminalRequest = serde_json::from_str("{}").unwrap();
        assert!(untouched.branch_id.is_none());
    }
}
