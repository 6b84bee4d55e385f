//! Core operations, one service per entity kind.
//!
//! Every mutation runs the same pipeline: authorize against the policy
//! table, validate the payload, persist (status side effects included),
//! then record one audit entry. A denied or invalid request never
//! reaches persistence and leaves no audit trace.

pub mod alert;
pub mod atm;
pub mod audit_log;
pub mod auth;
pub mod branch;
pub mod dashboard;
pub mod monitored_system;
pub mod performance_report;
pub mod pos_terminal;
pub mod security_event;
pub mod support_ticket;
pub mod user;

pub use alert::AlertService;
pub use atm::AtmService;
pub use audit_log::AuditLogService;
pub use auth::{AuthService, LoginResult};
pub use branch::BranchService;
pub use dashboard::DashboardService;
pub use monitored_system::MonitoredSystemService;
pub use performance_report::PerformanceReportService;
pub use pos_terminal::PosTerminalService;
pub use security_event::SecurityEventService;
pub use support_ticket::SupportTicketService;
pub use user::UserService;

use thiserror::Error;

use domain::models::{ActorContext, EntityKind};
use domain::services::{is_allowed, Action};

/// Errors surfaced by the core operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is deactivated")]
    UserDisabled,

    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reject the operation unless the policy table allows it.
fn authorize(actor: &ActorContext, action: Action, kind: EntityKind) -> Result<(), ServiceError> {
    if is_allowed(actor.role, action, kind) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "{} may not {} {}",
            actor.role.label(),
            action,
            kind
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::UserRole;
    use uuid::Uuid;

    fn actor(role: UserRole) -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "p.svoboda".to_string(),
            role,
            branch_id: None,
            ip_address: None,
            user_agent: None,
            request_id: None,
        }
    }

    #[test]
    fn test_authorize_passes_allowed_actions() {
        assert!(authorize(&actor(UserRole::Admin), Action::Delete, EntityKind::Branch).is_ok());
        assert!(authorize(
            &actor(UserRole::SupportTech),
            Action::Create,
            EntityKind::SupportTicket
        )
        .is_ok());
    }

    #[test]
    fn test_authorize_names_role_and_action_in_denial() {
        let err = authorize(&actor(UserRole::Viewer), Action::Update, EntityKind::Atm)
            .expect_err("viewer update must be denied");
        match err {
            ServiceError::Forbidden(message) => {
                assert!(message.contains("Viewer"));
                assert!(message.contains("update"));
                assert!(message.contains("atm"));
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
