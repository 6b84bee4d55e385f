//! Dashboard counts repository for database operations.

use chrono::Utc;
use sqlx::{PgPool, Row};

use domain::models::{
    AlertCounts, AtmCounts, BranchCounts, DashboardSummary, SecurityEventCounts, SystemCounts,
    TicketCounts, LOW_CASH_THRESHOLD,
};

use crate::metrics::QueryTimer;

/// Repository for dashboard count queries.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Collect the landing-page counts, one pass per table, all tables in
    /// parallel.
    pub async fn summary(&self) -> Result<DashboardSummary, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_summary");
        let result = tokio::try_join!(
            self.branch_counts(),
            self.atm_counts(),
            self.ticket_counts(),
            self.system_counts(),
            self.alert_counts(),
            self.security_event_counts(),
        );
        timer.record();
        let (branches, atms, tickets, systems, alerts, security_events) = result?;

        Ok(DashboardSummary {
            branches,
            atms,
            tickets,
            systems,
            alerts,
            security_events,
            generated_at: Utc::now(),
        })
    }

    async fn branch_counts(&self) -> Result<BranchCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'ACTIVE') AS active
            FROM branches
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(BranchCounts {
            total: row.get::<i64, _>("total"),
            active: row.get::<i64, _>("active"),
        })
    }

    async fn atm_counts(&self) -> Result<AtmCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'ONLINE') AS online,
                COUNT(*) FILTER (WHERE status = 'OFFLINE') AS offline,
                COUNT(*) FILTER (WHERE cash_level < $1) AS low_cash
            FROM atms
            "#,
        )
        .bind(LOW_CASH_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        Ok(AtmCounts {
            total: row.get::<i64, _>("total"),
            online: row.get::<i64, _>("online"),
            offline: row.get::<i64, _>("offline"),
            low_cash: row.get::<i64, _>("low_cash"),
        })
    }

    async fn ticket_counts(&self) -> Result<TicketCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'OPEN') AS open,
                COUNT(*) FILTER (WHERE status = 'IN_PROGRESS') AS in_progress,
                COUNT(*) FILTER (
                    WHERE priority = 'CRITICAL'
                      AND status NOT IN ('RESOLVED', 'CLOSED', 'CANCELLED')
                ) AS critical_open
            FROM support_tickets
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TicketCounts {
            open: row.get::<i64, _>("open"),
            in_progress: row.get::<i64, _>("in_progress"),
            critical_open: row.get::<i64, _>("critical_open"),
        })
    }

    async fn system_counts(&self) -> Result<SystemCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'OPERATIONAL') AS operational,
                COUNT(*) FILTER (WHERE status = 'WARNING') AS warning,
                COUNT(*) FILTER (WHERE status = 'CRITICAL') AS critical,
                COUNT(*) FILTER (WHERE status = 'DOWN') AS down
            FROM monitored_systems
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SystemCounts {
            operational: row.get::<i64, _>("operational"),
            warning: row.get::<i64, _>("warning"),
            critical: row.get::<i64, _>("critical"),
            down: row.get::<i64, _>("down"),
        })
    }

    async fn alert_counts(&self) -> Result<AlertCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'ACTIVE') AS active,
                COUNT(*) FILTER (WHERE status = 'ACKNOWLEDGED') AS acknowledged
            FROM alerts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AlertCounts {
            active: row.get::<i64, _>("active"),
            acknowledged: row.get::<i64, _>("acknowledged"),
        })
    }

    async fn security_event_counts(&self) -> Result<SecurityEventCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'NEW') AS new,
                COUNT(*) FILTER (WHERE status = 'INVESTIGATING') AS investigating,
                COUNT(*) FILTER (
                    WHERE severity = 'CRITICAL'
                      AND status NOT IN ('RESOLVED', 'FALSE_POSITIVE')
                ) AS critical_open
            FROM security_events
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SecurityEventCounts {
            new: row.get::<i64, _>("new"),
            investigating: row.get::<i64, _>("investigating"),
            critical_open: row.get::<i64, _>("critical_open"),
        })
    }
}
