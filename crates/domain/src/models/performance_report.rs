//! Performance reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
    Custom,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DAILY" => Ok(ReportType::Daily),
            "WEEKLY" => Ok(ReportType::Weekly),
            "MONTHLY" => Ok(ReportType::Monthly),
            "QUARTERLY" => Ok(ReportType::Quarterly),
            "ANNUAL" => Ok(ReportType::Annual),
            "CUSTOM" => Ok(ReportType::Custom),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportType::Daily => "DAILY",
            ReportType::Weekly => "WEEKLY",
            ReportType::Monthly => "MONTHLY",
            ReportType::Quarterly => "QUARTERLY",
            ReportType::Annual => "ANNUAL",
            ReportType::Custom => "CUSTOM",
        };
        write!(f, "{}", s)
    }
}

/// Aggregated performance figures for a reporting period. Reports have
/// no lifecycle; the figures are supplied by the caller and `report_data`
/// holds free-form breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub id: Uuid,
    pub report_type: ReportType,
    pub title: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub branch_id: Option<Uuid>,
    pub total_tickets: i32,
    pub resolved_tickets: i32,
    pub avg_resolution_hours: f64,
    pub atm_uptime_percentage: f64,
    pub system_uptime_percentage: f64,
    pub incident_count: i32,
    pub summary: Option<String>,
    pub report_data: JsonValue,
    pub generated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_report_data() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

fn default_uptime() -> f64 {
    100.0
}

/// Request to file a report. `generated_by` comes from the session, not
/// the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_report_period"))]
pub struct CreatePerformanceReportRequest {
    pub report_type: ReportType,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub period_start: NaiveDate,

    pub period_end: NaiveDate,

    pub branch_id: Option<Uuid>,

    #[serde(default)]
    pub total_tickets: i32,

    #[serde(default)]
    pub resolved_tickets: i32,

    #[serde(default)]
    pub avg_resolution_hours: f64,

    #[serde(default = "default_uptime")]
    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub atm_uptime_percentage: f64,

    #[serde(default = "default_uptime")]
    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub system_uptime_percentage: f64,

    #[serde(default)]
    pub incident_count: i32,

    #[validate(length(max = 5000))]
    pub summary: Option<String>,

    #[serde(default = "default_report_data")]
    pub report_data: JsonValue,
}

fn validate_report_period(
    request: &CreatePerformanceReportRequest,
) -> Result<(), validator::ValidationError> {
    if request.period_end < request.period_start {
        let mut err = validator::ValidationError::new("invalid_period");
        err.message = Some("period_end must not precede period_start".into());
        return Err(err);
    }
    Ok(())
}

/// Partial update of a report. The period and report type are fixed at
/// creation; only the figures and narrative can be corrected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePerformanceReportRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub total_tickets: Option<i32>,

    pub resolved_tickets: Option<i32>,

    pub avg_resolution_hours: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub atm_uptime_percentage: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub system_uptime_percentage: Option<f64>,

    pub incident_count: Option<i32>,

    #[validate(length(max = 5000))]
    pub summary: Option<String>,

    pub report_data: Option<JsonValue>,
}

/// Query parameters for listing reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPerformanceReportsQuery {
    pub search: Option<String>,
    pub report_type: Option<ReportType>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreatePerformanceReportRequest {
        CreatePerformanceReportRequest {
            report_type: ReportType::Monthly,
            title: "July branch operations".to_string(),
            period_start: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            branch_id: None,
            total_tickets: 182,
            resolved_tickets: 171,
            avg_resolution_hours: 9.4,
            atm_uptime_percentage: 99.2,
            system_uptime_percentage: 99.9,
            incident_count: 3,
            summary: Some("Stable month, one skimming incident.".to_string()),
            report_data: default_report_data(),
        }
    }

    #[test]
    fn test_report_type_roundtrip() {
        for t in [
            ReportType::Daily,
            ReportType::Weekly,
            ReportType::Monthly,
            ReportType::Quarterly,
            ReportType::Annual,
            ReportType::Custom,
        ] {
            assert_eq!(ReportType::from_str(&t.to_string()).unwrap(), t);
        }
    }

    #[test]
    fn test_valid_report_passes() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_inverted_period_rejected() {
        let mut request = sample_request();
        request.period_end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_single_day_period_allowed() {
        let mut request = sample_request();
        request.report_type = ReportType::Daily;
        request.period_end = request.period_start;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_uptime_over_hundred_rejected() {
        let mut request = sample_request();
        request.atm_uptime_percentage = 100.5;
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("atm_uptime_percentage"));
    }
}
