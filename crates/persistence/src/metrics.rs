//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record connection pool gauges. Called from the metrics endpoint so
/// every scrape carries fresh pool numbers.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Count a failed audit append. The triggering mutation stays committed;
/// this counter is the operational signal that the trail has a hole.
pub fn record_audit_write_failure(entity_kind: &str) {
    counter!(
        "audit_write_failures_total",
        "entity_kind" => entity_kind.to_string()
    )
    .increment(1);
}

/// Times a database operation and records it on drop of the call site's
/// choosing.
///
/// ```ignore
/// let timer = QueryTimer::new("list_support_tickets");
/// let result = repo.list(...).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_creation() {
        let timer = QueryTimer::new("test_query");
        assert_eq!(timer.query_name, "test_query");
    }

    #[test]
    fn test_query_timer_records_without_panic() {
        let timer = QueryTimer::new("list_support_tickets");
        timer.record();
        record_audit_write_failure("support_ticket");
    }
}
