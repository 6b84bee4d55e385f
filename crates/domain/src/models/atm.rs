//! ATM fleet records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Cash level below which an ATM is considered low on cash.
pub const LOW_CASH_THRESHOLD: i64 = 20_000;

/// Cash level below which an ATM is considered critically low.
pub const CRITICAL_CASH_THRESHOLD: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AtmType {
    Onsite,
    Offsite,
    DriveUp,
    WalkUp,
    Lobby,
}

impl FromStr for AtmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONSITE" => Ok(AtmType::Onsite),
            "OFFSITE" => Ok(AtmType::Offsite),
            "DRIVE_UP" => Ok(AtmType::DriveUp),
            "WALK_UP" => Ok(AtmType::WalkUp),
            "LOBBY" => Ok(AtmType::Lobby),
            _ => Err(format!("Unknown ATM type: {}", s)),
        }
    }
}

impl std::fmt::Display for AtmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AtmType::Onsite => "ONSITE",
            AtmType::Offsite => "OFFSITE",
            AtmType::DriveUp => "DRIVE_UP",
            AtmType::WalkUp => "WALK_UP",
            AtmType::Lobby => "LOBBY",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AtmStatus {
    #[default]
    Online,
    Offline,
    Maintenance,
    OutOfService,
    CashDepleted,
}

impl FromStr for AtmStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONLINE" => Ok(AtmStatus::Online),
            "OFFLINE" => Ok(AtmStatus::Offline),
            "MAINTENANCE" => Ok(AtmStatus::Maintenance),
            "OUT_OF_SERVICE" => Ok(AtmStatus::OutOfService),
            "CASH_DEPLETED" => Ok(AtmStatus::CashDepleted),
            _ => Err(format!("Unknown ATM status: {}", s)),
        }
    }
}

impl std::fmt::Display for AtmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AtmStatus::Online => "ONLINE",
            AtmStatus::Offline => "OFFLINE",
            AtmStatus::Maintenance => "MAINTENANCE",
            AtmStatus::OutOfService => "OUT_OF_SERVICE",
            AtmStatus::CashDepleted => "CASH_DEPLETED",
        };
        write!(f, "{}", s)
    }
}

/// Cash-level filter bands for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashBand {
    /// Below [`LOW_CASH_THRESHOLD`].
    Low,
    /// Below [`CRITICAL_CASH_THRESHOLD`].
    Critical,
}

impl CashBand {
    pub fn threshold(&self) -> i64 {
        match self {
            CashBand::Low => LOW_CASH_THRESHOLD,
            CashBand::Critical => CRITICAL_CASH_THRESHOLD,
        }
    }
}

/// ATM domain model.
#[derive(Debug, Clone, Serialize)]
pub struct Atm {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub branch_id: Uuid,
    pub atm_type: AtmType,
    pub status: AtmStatus,
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

impl Atm {
    /// Remaining cash as a percentage of capacity (0 when capacity is 0).
    ///
    /// cash_level ≤ max_cash_capacity is a soft invariant and not enforced
    /// at write time, so this can exceed 100 for inconsistent data.
    pub fn cash_percentage(&self) -> f64 {
        if self.max_cash_capacity == 0 {
            0.0
        } else {
            self.cash_level as f64 / self.max_cash_capacity as f64 * 100.0
        }
    }

    pub fn is_low_on_cash(&self) -> bool {
        self.cash_level < LOW_CASH_THRESHOLD
    }
}

/// Request to register an ATM. `code`, `serial_number` and
/// `installation_date` are immutable after creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAtmRequest {
    #[validate(custom(function = "shared::validation::validate_entity_code"))]
    pub code: String,

    #[validate(length(min = 1, max = 150))]
    pub name: String,

    pub branch_id: Uuid,

    pub atm_type: AtmType,

    #[serde(default)]
    pub status: AtmStatus,

    #[validate(length(max = 100))]
    pub manufacturer: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub ip_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative_amount"))]
    #[serde(default)]
    pub cash_level: i64,

    #[validate(custom(function = "shared::validation::validate_non_negative_amount"))]
    pub max_cash_capacity: i64,

    #[validate(length(min = 3, max = 3))]
    #[serde(default = "default_currency")]
    pub cash_currency: String,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    #[serde(default = "default_uptime")]
    pub uptime_percentage: f64,

    pub installation_date: Option<NaiveDate>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_uptime() -> f64 {
    100.0
}

/// Partial update of an ATM.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAtmRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,

    pub atm_type: Option<AtmType>,

    pub status: Option<AtmStatus>,

    #[validate(length(max = 100))]
    pub manufacturer: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(custom(function = "shared::validation::validate_ip_address"))]
    pub ip_address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative_amount"))]
    pub cash_level: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_non_negative_amount"))]
    pub max_cash_capacity: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub uptime_percentage: Option<f64>,

    pub last_maintenance_date: Option<NaiveDate>,
}

/// Query parameters for listing ATMs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAtmsQuery {
    pub search: Option<String>,
    pub status: Option<AtmStatus>,
    pub atm_type: Option<AtmType>,
    pub branch_id: Option<Uuid>,
    pub cash_band: Option<CashBand>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_atm(cash_level: i64, capacity: i64) -> Atm {
        Atm {
            id: Uuid::new_v4(),
            code: "ATM-001".to_string(),
            name: "Lobby ATM".to_string(),
            branch_id: Uuid::new_v4(),
            atm_type: AtmType::Lobby,
            status: AtmStatus::Online,
            manufacturer: None,
            model: None,
            serial_number: "SN-9001".to_string(),
            ip_address: None,
            cash_level,
            max_cash_capacity: capacity,
            cash_currency: "USD".to_string(),
            uptime_percentage: 99.5,
            installation_date: None,
            last_maintenance_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cash_percentage() {
        let atm = sample_atm(5_000, 100_000);
        assert!((atm.cash_percentage() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cash_percentage_zero_capacity() {
        let atm = sample_atm(5_000, 0);
        assert_eq!(atm.cash_percentage(), 0.0);
    }

    #[test]
    fn test_cash_percentage_over_capacity() {
        // Soft invariant: not rejected at write time.
        let atm = sample_atm(150_000, 100_000);
        assert!(atm.cash_percentage() > 100.0);
    }

    #[test]
    fn test_low_cash_flag() {
        assert!(sample_atm(19_999, 100_000).is_low_on_cash());
        assert!(!sample_atm(20_000, 100_000).is_low_on_cash());
    }

    #[test]
    fn test_cash_band_thresholds() {
        assert_eq!(CashBand::Low.threshold(), 20_000);
        assert_eq!(CashBand::Critical.threshold(), 10_000);
    }

    #[test]
    fn test_atm_status_roundtrip() {
        for status in [
            AtmStatus::Online,
            AtmStatus::Offline,
            AtmStatus::Maintenance,
            AtmStatus::OutOfService,
            AtmStatus::CashDepleted,
        ] {
            assert_eq!(AtmStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }

    #[test]
    fn test_create_atm_request_validation() {
        let request = CreateAtmRequest {
            code: "ATM-014".to_string(),
            name: "Drive-up ATM".to_string(),
            branch_id: Uuid::new_v4(),
            atm_type: AtmType::DriveUp,
            status: AtmStatus::Online,
            manufacturer: Some("NCR".to_string()),
            model: Some("SelfServ 84".to_string()),
            serial_number: "NCR-84-01".to_string(),
            ip_address: Some("10.4.1.21".to_string()),
            cash_level: 80_000,
            max_cash_capacity: 200_000,
            cash_currency: "USD".to_string(),
            uptime_percentage: 99.9,
            installation_date: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_atm_request_rejects_negative_cash() {
        let request = CreateAtmRequest {
            code: "ATM-014".to_string(),
            name: "X".to_string(),
            branch_id: Uuid::new_v4(),
            atm_type: AtmType::Onsite,
            status: AtmStatus::Online,
            manufacturer: None,
            model: None,
            serial_number: "SN".to_string(),
            ip_address: Some("not-an-ip".to_string()),
            cash_level: -5,
            max_cash_capacity: 100,
            cash_currency: "USD".to_string(),
            uptime_percentage: 101.0,
            installation_date: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cash_level"));
        assert!(fields.contains_key("ip_address"));
        assert!(fields.contains_key("uptime_percentage"));
    }
}
