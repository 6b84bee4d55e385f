//! Dashboard read models.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BranchCounts {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtmCounts {
    pub total: i64,
    pub online: i64,
    pub offline: i64,
    pub low_cash: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketCounts {
    pub open: i64,
    pub in_progress: i64,
    pub critical_open: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemCounts {
    pub operational: i64,
    pub warning: i64,
    pub critical: i64,
    pub down: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertCounts {
    pub active: i64,
    pub acknowledged: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityEventCounts {
    pub new: i64,
    pub investigating: i64,
    pub critical_open: i64,
}

/// Operational counts shown on the landing dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub branches: BranchCounts,
    pub atms: AtmCounts,
    pub tickets: TicketCounts,
    pub systems: SystemCounts,
    pub alerts: AlertCounts,
    pub security_events: SecurityEventCounts,
    pub generated_at: DateTime<Utc>,
}
