//! Performance report entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{PerformanceReport, ReportType};

/// Database row mapping for the performance_reports table.
#[derive(Debug, Clone, FromRow)]
pub struct PerformanceReportEntity {
    pub id: Uuid,
    pub report_type: String,
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

impl From<PerformanceReportEntity> for PerformanceReport {
    fn from(entity: PerformanceReportEntity) -> Self {
        Self {
            id: entity.id,
            report_type: entity.report_type.parse().unwrap_or(ReportType::Custom),
            title: entity.title,
            period_start: entity.period_start,
            period_end: entity.period_end,
            branch_id: entity.branch_id,
            total_tickets: entity.total_tickets,
            resolved_tickets: entity.resolved_tickets,
            avg_resolution_hours: entity.avg_resolution_hours,
            atm_uptime_percentage: entity.atm_uptime_percentage,
            system_uptime_percentage: entity.system_uptime_percentage,
            incident_count: entity.incident_count,
            summary: entity.summary,
            report_data: entity.report_data,
            generated_by: entity.generated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_entity_to_domain() {
        let entity = PerformanceReportEntity {
            id: Uuid::new_v4(),
            report_type: "MONTHLY".to_string(),
            title: "March branch summary".to_string(),
            period_start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            branch_id: Some(Uuid::new_v4()),
            total_tickets: 41,
            resolved_tickets: 38,
            avg_resolution_hours: 6.4,
            atm_uptime_percentage: 99.1,
            system_uptime_percentage: 99.8,
            incident_count: 2,
            summary: Some("Two skimming attempts, both contained.".to_string()),
            report_data: json!({"busiest_day": "2025-03-14"}),
            generated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let report: PerformanceReport = entity.into();
        assert_eq!(report.report_type, ReportType::Monthly);
        assert_eq!(report.resolved_tickets, 38);
        assert_eq!(report.incident_count, 2);
        assert_eq!(report.report_data["busiest_day"], "2025-03-14");
    }

    #[test]
    fn test_unknown_report_type_falls_back_to_custom() {
        let entity = PerformanceReportEntity {
            id: Uuid::new_v4(),
            report_type: "BIENNIAL".to_string(),
            title: "t".to_string(),
            period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            branch_id: None,
            total_tickets: 0,
            resolved_tickets: 0,
            avg_resolution_hours: 0.0,
            atm_uptime_percentage: 100.0,
            system_uptime_percentage: 100.0,
            incident_count: 0,
            summary: None,
            report_data: json!({}),
            generated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let report: PerformanceReport = entity.into();
        assert_eq!(report.report_type, ReportType::Custom);
    }
}
