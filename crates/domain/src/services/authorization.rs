//! Role-based authorization policy.
//!
//! A single data-driven table keyed by (role, action, entity kind),
//! queried through pure functions. Callers reject before any lifecycle,
//! persistence or audit work happens; unauthenticated requests never get
//! this far.

use uuid::Uuid;

use crate::models::{ActorContext, Alert, EntityKind, SupportTicket, UserRole};

/// Actions the policy table distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Update, Action::Delete];

    /// The three mutating actions, in audit-log order.
    pub const MUTATIONS: [Action; 3] = [Action::Create, Action::Update, Action::Delete];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

/// Whether `role` may perform `action` on entities of `kind`.
///
/// Viewer is read-only across the board. Deletion is reserved for
/// administrators everywhere except ticket comments, which any staff
/// role may remove. Audit log rows have no mutation surface; the
/// recorder writes them outside this table.
pub fn is_allowed(role: UserRole, action: Action, kind: EntityKind) -> bool {
    use EntityKind::*;
    use UserRole::*;

    match action {
        Action::View => match kind {
            User | AuditLog => role == Admin,
            MonitoredSystem => matches!(role, Admin | ItOfficer | SupportTech),
            SecurityEvent => matches!(role, Admin | SecurityOfficer),
            Branch | Atm | PosTerminal | SupportTicket | TicketComment | Alert
            | PerformanceReport => true,
        },
        Action::Create => match kind {
            User | AuditLog | Branch => role == Admin,
            Atm | PosTerminal | MonitoredSystem | Alert | PerformanceReport => {
                matches!(role, Admin | ItOfficer | SupportTech)
            }
            SupportTicket | TicketComment => role != Viewer,
            SecurityEvent => matches!(role, Admin | SecurityOfficer),
        },
        Action::Update => match kind {
            // Comments are immutable once written.
            TicketComment => false,
            User | AuditLog | Branch => role == Admin,
            Atm | PosTerminal | MonitoredSystem | Alert | PerformanceReport => {
                matches!(role, Admin | ItOfficer | SupportTech)
            }
            SupportTicket => role != Viewer,
            SecurityEvent => matches!(role, Admin | SecurityOfficer),
        },
        Action::Delete => match kind {
            TicketComment => role != Viewer,
            _ => role == Admin,
        },
    }
}

/// Row-level visibility for ticket lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    /// No row restriction.
    All,
    /// Only tickets of this branch.
    BranchOnly(Uuid),
    /// Only tickets assigned to this user or left unassigned.
    AssignedOrUnassigned(Uuid),
    /// No rows at all.
    Nothing,
}

/// Row-level visibility for alert lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertScope {
    All,
    BranchOnly(Uuid),
    Nothing,
}

/// Which tickets the actor's lists and lookups may contain. A branch
/// manager without a branch assignment sees nothing rather than
/// everything.
pub fn ticket_scope(actor: &ActorContext) -> TicketScope {
    match actor.role {
        UserRole::Admin | UserRole::SecurityOfficer | UserRole::Viewer => TicketScope::All,
        UserRole::BranchManager => match actor.branch_id {
            Some(branch_id) => TicketScope::BranchOnly(branch_id),
            None => TicketScope::Nothing,
        },
        UserRole::ItOfficer | UserRole::SupportTech => {
            TicketScope::AssignedOrUnassigned(actor.user_id)
        }
    }
}

/// Which alerts the actor's lists and lookups may contain.
pub fn alert_scope(actor: &ActorContext) -> AlertScope {
    match actor.role {
        UserRole::BranchManager => match actor.branch_id {
            Some(branch_id) => AlertScope::BranchOnly(branch_id),
            None => AlertScope::Nothing,
        },
        _ => AlertScope::All,
    }
}

/// Whether a fetched ticket falls inside the given scope. Single-row
/// lookups apply the same restriction as lists; an out-of-scope ticket
/// reads as absent.
pub fn ticket_in_scope(scope: TicketScope, ticket: &SupportTicket) -> bool {
    match scope {
        TicketScope::All => true,
        TicketScope::BranchOnly(branch_id) => ticket.branch_id == branch_id,
        TicketScope::AssignedOrUnassigned(user_id) => {
            ticket.assigned_to.is_none() || ticket.assigned_to == Some(user_id)
        }
        TicketScope::Nothing => false,
    }
}

/// Whether a fetched alert falls inside the given scope.
pub fn alert_in_scope(scope: AlertScope, alert: &Alert) -> bool {
    match scope {
        AlertScope::All => true,
        AlertScope::BranchOnly(branch_id) => alert.branch_id == Some(branch_id),
        AlertScope::Nothing => false,
    }
}

/// Whether the role may read comments flagged internal.
pub fn can_view_internal_comments(role: UserRole) -> bool {
    matches!(
        role,
        UserRole::Admin | UserRole::ItOfficer | UserRole::SupportTech | UserRole::SecurityOfficer
    )
}
