//! Landing-page summary counts.

use sqlx::PgPool;

use domain::models::{ActorContext, DashboardSummary};
use persistence::repositories::DashboardRepository;

use super::ServiceError;

#[derive(Clone)]
pub struct DashboardService {
    dashboard: DashboardRepository,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            dashboard: DashboardRepository::new(pool),
        }
    }

    /// Aggregate counts for the dashboard. Available to every
    /// authenticated user; the numbers reveal nothing row-level.
    pub async fn summary(&self, _actor: &ActorContext) -> Result<DashboardSummary, ServiceError> {
        Ok(self.dashboard.summary().await?)
    }
}
