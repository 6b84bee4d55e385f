//! Domain services.
//!
//! Pure business logic that operates on domain models: the authorization
//! policy, status-transition effects and audit change computation.

pub mod audit;
pub mod authorization;
pub mod lifecycle;

pub use audit::entity_changes;

pub use authorization::{
    alert_in_scope, alert_scope, can_view_internal_comments, is_allowed, ticket_in_scope,
    ticket_scope, Action, AlertScope, TicketScope,
};

pub use lifecycle::{
    alert_effects, format_ticket_number, parse_ticket_number, security_event_effects,
    ticket_effects, AlertEffects, SecurityEventEffects, TicketEffects,
};
