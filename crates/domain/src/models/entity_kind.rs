//! Entity kind enumeration shared by authorization and audit recording.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The record types managed by this system.
///
/// The string form (`Display`/`FromStr`) is the canonical name stored in
/// audit rows and used in policy lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Branch,
    Atm,
    PosTerminal,
    MonitoredSystem,
    SupportTicket,
    TicketComment,
    SecurityEvent,
    Alert,
    PerformanceReport,
    User,
    AuditLog,
}

impl EntityKind {
    /// All kinds, in a stable order. Used by policy-table tests.
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Branch,
        EntityKind::Atm,
        EntityKind::PosTerminal,
        EntityKind::MonitoredSystem,
        EntityKind::SupportTicket,
        EntityKind::TicketComment,
        EntityKind::SecurityEvent,
        EntityKind::Alert,
        EntityKind::PerformanceReport,
        EntityKind::User,
        EntityKind::AuditLog,
    ];
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "branch" => Ok(EntityKind::Branch),
            "atm" => Ok(EntityKind::Atm),
            "pos_terminal" => Ok(EntityKind::PosTerminal),
            "monitored_system" => Ok(EntityKind::MonitoredSystem),
            "support_ticket" => Ok(EntityKind::SupportTicket),
            "ticket_comment" => Ok(EntityKind::TicketComment),
            "security_event" => Ok(EntityKind::SecurityEvent),
            "alert" => Ok(EntityKind::Alert),
            "performance_report" => Ok(EntityKind::PerformanceReport),
            "user" => Ok(EntityKind::User),
            "audit_log" => Ok(EntityKind::AuditLog),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Branch => "branch",
            EntityKind::Atm => "atm",
            EntityKind::PosTerminal => "pos_terminal",
            EntityKind::MonitoredSystem => "monitored_system",
            EntityKind::SupportTicket => "support_ticket",
            EntityKind::TicketComment => "ticket_comment",
            EntityKind::SecurityEvent => "security_event",
            EntityKind::Alert => "alert",
            EntityKind::PerformanceReport => "performance_report",
            EntityKind::User => "user",
            EntityKind::AuditLog => "audit_log",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in EntityKind::ALL {
            let s = kind.to_string();
            assert_eq!(EntityKind::from_str(&s).unwrap(), kind);
        }
    }

    #[test]
    fn test_entity_kind_from_str_case_insensitive() {
        assert_eq!(
            EntityKind::from_str("SUPPORT_TICKET").unwrap(),
            EntityKind::SupportTicket
        );
    }

    #[test]
    fn test_entity_kind_from_str_unknown() {
        assert!(EntityKind::from_str("widget").is_err());
    }
}
