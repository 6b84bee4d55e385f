//! Status-transition side effects.
//!
//! Each function takes the prior record and the target status and returns
//! the full post-update values of the timestamp fields the transition
//! owns. The fields are ratchets: stamped the first time a record enters
//! the triggering status, then never recomputed or cleared, not even when
//! the status later moves backwards. Callers persist the returned values
//! in the same transaction as the status write.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::models::{
    Alert, AlertStatus, SecurityEvent, SecurityEventStatus, SupportTicket, TicketStatus,
};

lazy_static! {
    static ref TICKET_NUMBER_RE: Regex = Regex::new(r"^TKT-(\d{6,})$").unwrap();
}

/// Post-update values for a ticket's ratchet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketEffects {
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub resolution_seconds: Option<i64>,
}

/// Effects of moving `prior` to `target` at `now`.
///
/// Entering RESOLVED stamps `resolved_at` and derives the resolution
/// duration from ticket creation; entering CLOSED stamps `closed_at`.
/// A ticket closed without ever being resolved gets no `resolved_at`.
pub fn ticket_effects(
    prior: &SupportTicket,
    target: TicketStatus,
    now: DateTime<Utc>,
) -> TicketEffects {
    let mut effects = TicketEffects {
        resolved_at: prior.resolved_at,
        closed_at: prior.closed_at,
        resolution_seconds: prior.resolution_seconds,
    };

    if target == TicketStatus::Resolved && effects.resolved_at.is_none() {
        effects.resolved_at = Some(now);
        effects.resolution_seconds = Some((now - prior.created_at).num_seconds().max(0));
    }
    if target == TicketStatus::Closed && effects.closed_at.is_none() {
        effects.closed_at = Some(now);
    }

    effects
}

/// Post-update value for a security event's `resolved_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityEventEffects {
    pub resolved_at: Option<DateTime<Utc>>,
}

pub fn security_event_effects(
    prior: &SecurityEvent,
    target: SecurityEventStatus,
    now: DateTime<Utc>,
) -> SecurityEventEffects {
    let mut effects = SecurityEventEffects {
        resolved_at: prior.resolved_at,
    };
    if target == SecurityEventStatus::Resolved && effects.resolved_at.is_none() {
        effects.resolved_at = Some(now);
    }
    effects
}

/// Post-update values for an alert's ratchet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertEffects {
    pub acknowledged_by: Option<Uuid>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Effects of moving `prior` to `target` at `now`, acknowledged by
/// `actor_id` where the transition records one. The first actor to
/// acknowledge keeps the credit.
pub fn alert_effects(
    prior: &Alert,
    target: AlertStatus,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> AlertEffects {
    let mut effects = AlertEffects {
        acknowledged_by: prior.acknowledged_by,
        acknowledged_at: prior.acknowledged_at,
        resolved_at: prior.resolved_at,
    };

    if target == AlertStatus::Acknowledged && effects.acknowledged_at.is_none() {
        effects.acknowledged_by = Some(actor_id);
        effects.acknowledged_at = Some(now);
    }
    if target == AlertStatus::Resolved && effects.resolved_at.is_none() {
        effects.resolved_at = Some(now);
    }

    effects
}

/// Format a sequence value as a ticket number, `TKT-000001` style.
pub fn format_ticket_number(value: i64) -> String {
    format!("TKT-{:06}", value)
}

/// Parse the numeric part of a ticket number. Returns `None` for
/// anything that is not a well-formed number.
pub fn parse_ticket_number(number: &str) -> Option<i64> {
    TICKET_NUMBER_RE
        .captures(number)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AlertType, Severity, SecurityEventType, TicketCategory, TicketPriority,
    };
    use chrono::Duration;

    fn ticket(status: TicketStatus, created_at: DateTime<Utc>) -> SupportTicket {
        SupportTicket {
            id: Uuid::new_v4(),
            ticket_number: "TKT-000007".to_string(),
            title: "Receipt printer jam".to_string(),
            description: "Printer jams on every withdrawal receipt.".to_string(),
            category: TicketCategory::Hardware,
            priority: TicketPriority::Medium,
            status,
            branch_id: Uuid::new_v4(),
            atm_id: None,
            pos_terminal_id: None,
            reported_by: None,
            assigned_to: None,
            resolution_notes: None,
            resolved_at: None,
            closed_at: None,
            resolution_seconds: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn security_event(status: SecurityEventStatus) -> SecurityEvent {
        let now = Utc::now();
        SecurityEvent {
            id: Uuid::new_v4(),
            event_type: SecurityEventType::Phishing,
            severity: Severity::Medium,
            status,
            title: "Phishing mail reported".to_string(),
            description: "Teller forwarded a credential-harvesting mail.".to_string(),
            branch_id: None,
            affected_user_id: None,
            assigned_to: None,
            source_ip: None,
            detected_at: now,
            resolved_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn alert(status: AlertStatus) -> Alert {
        let now = Utc::now();
        Alert {
            id: Uuid::new_v4(),
            alert_type: AlertType::AtmOffline,
            severity: Severity::High,
            status,
            title: "ATM-0042 offline".to_string(),
            message: "No heartbeat for 10 minutes.".to_string(),
            branch_id: None,
            atm_id: None,
            pos_terminal_id: None,
            security_event_id: None,
            acknowledged_by: None,
            acknowledged_at: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_resolving_stamps_timestamp_and_duration() {
        let created = Utc::now() - Duration::hours(3);
        let prior = ticket(TicketStatus::InProgress, created);
        let now = Utc::now();

        let effects = ticket_effects(&prior, TicketStatus::Resolved, now);
        assert_eq!(effects.resolved_at, Some(now));
        assert_eq!(
            effects.resolution_seconds,
            Some((now - created).num_seconds())
        );
        assert!(effects.resolution_seconds.unwrap() >= 0);
        assert_eq!(effects.closed_at, None);
    }

    #[test]
    fn test_resolving_again_changes_nothing() {
        let created = Utc::now() - Duration::hours(3);
        let mut prior = ticket(TicketStatus::Resolved, created);
        let first_resolved = Utc::now() - Duration::hours(1);
        prior.resolved_at = Some(first_resolved);
        prior.resolution_seconds = Some(7200);

        let effects = ticket_effects(&prior, TicketStatus::Resolved, Utc::now());
        assert_eq!(effects.resolved_at, Some(first_resolved));
        assert_eq!(effects.resolution_seconds, Some(7200));
    }

    #[test]
    fn test_reopening_keeps_the_ratchet() {
        let created = Utc::now() - Duration::days(2);
        let mut prior = ticket(TicketStatus::Resolved, created);
        let resolved = Utc::now() - Duration::days(1);
        prior.resolved_at = Some(resolved);
        prior.resolution_seconds = Some(86_400);

        let effects = ticket_effects(&prior, TicketStatus::Open, Utc::now());
        assert_eq!(effects.resolved_at, Some(resolved));
        assert_eq!(effects.resolution_seconds, Some(86_400));

        // Resolving a second time after the reopen still changes nothing.
        let effects = ticket_effects(&prior, TicketStatus::Resolved, Utc::now());
        assert_eq!(effects.resolved_at, Some(resolved));
        assert_eq!(effects.resolution_seconds, Some(86_400));
    }

    #[test]
    fn test_straight_to_closed_skips_resolved() {
        let prior = ticket(TicketStatus::Open, Utc::now() - Duration::hours(1));
        let now = Utc::now();

        let effects = ticket_effects(&prior, TicketStatus::Closed, now);
        assert_eq!(effects.closed_at, Some(now));
        assert_eq!(effects.resolved_at, None);
        assert_eq!(effects.resolution_seconds, None);
    }

    #[test]
    fn test_closing_after_resolution_keeps_both() {
        let created = Utc::now() - Duration::hours(5);
        let mut prior = ticket(TicketStatus::Resolved, created);
        let resolved = Utc::now() - Duration::hours(2);
        prior.resolved_at = Some(resolved);
        prior.resolution_seconds = Some(10_800);
        let now = Utc::now();

        let effects = ticket_effects(&prior, TicketStatus::Closed, now);
        assert_eq!(effects.resolved_at, Some(resolved));
        assert_eq!(effects.resolution_seconds, Some(10_800));
        assert_eq!(effects.closed_at, Some(now));
    }

    #[test]
    fn test_cancelling_stamps_nothing() {
        let prior = ticket(TicketStatus::Pending, Utc::now() - Duration::hours(1));
        let effects = ticket_effects(&prior, TicketStatus::Cancelled, Utc::now());
        assert_eq!(effects.resolved_at, None);
        assert_eq!(effects.closed_at, None);
        assert_eq!(effects.resolution_seconds, None);
    }

    #[test]
    fn test_security_event_resolution_is_one_way() {
        let prior = security_event(SecurityEventStatus::Investigating);
        let now = Utc::now();
        let effects = security_event_effects(&prior, SecurityEventStatus::Resolved, now);
        assert_eq!(effects.resolved_at, Some(now));

        let mut resolved = security_event(SecurityEventStatus::Resolved);
        let stamp = Utc::now() - Duration::minutes(30);
        resolved.resolved_at = Some(stamp);
        let effects =
            security_event_effects(&resolved, SecurityEventStatus::Investigating, Utc::now());
        assert_eq!(effects.resolved_at, Some(stamp));
    }

    #[test]
    fn test_false_positive_stamps_nothing() {
        let prior = security_event(SecurityEventStatus::New);
        let effects =
            security_event_effects(&prior, SecurityEventStatus::FalsePositive, Utc::now());
        assert_eq!(effects.resolved_at, None);
    }

    #[test]
    fn test_first_acknowledger_keeps_credit() {
        let prior = alert(AlertStatus::Active);
        let first = Uuid::new_v4();
        let now = Utc::now();

        let effects = alert_effects(&prior, AlertStatus::Acknowledged, first, now);
        assert_eq!(effects.acknowledged_by, Some(first));
        assert_eq!(effects.acknowledged_at, Some(now));

        let mut acknowledged = alert(AlertStatus::Acknowledged);
        acknowledged.acknowledged_by = Some(first);
        acknowledged.acknowledged_at = Some(now);

        let second = Uuid::new_v4();
        let effects =
            alert_effects(&acknowledged, AlertStatus::Acknowledged, second, Utc::now());
        assert_eq!(effects.acknowledged_by, Some(first));
        assert_eq!(effects.acknowledged_at, Some(now));
    }

    #[test]
    fn test_alert_resolution_stamp() {
        let prior = alert(AlertStatus::Acknowledged);
        let now = Utc::now();
        let effects = alert_effects(&prior, AlertStatus::Resolved, Uuid::new_v4(), now);
        assert_eq!(effects.resolved_at, Some(now));
        assert_eq!(effects.acknowledged_at, None);
    }

    #[test]
    fn test_dismissing_stamps_nothing() {
        let prior = alert(AlertStatus::Active);
        let effects = alert_effects(&prior, AlertStatus::Dismissed, Uuid::new_v4(), Utc::now());
        assert_eq!(effects.acknowledged_by, None);
        assert_eq!(effects.acknowledged_at, None);
        assert_eq!(effects.resolved_at, None);
    }

    #[test]
    fn test_ticket_number_format() {
        assert_eq!(format_ticket_number(1), "TKT-000001");
        assert_eq!(format_ticket_number(101), "TKT-000101");
        assert_eq!(format_ticket_number(1_234_567), "TKT-1234567");
    }

    #[test]
    fn test_ticket_number_parse() {
        assert_eq!(parse_ticket_number("TKT-000001"), Some(1));
        assert_eq!(parse_ticket_number("TKT-1234567"), Some(1_234_567));
        assert_eq!(parse_ticket_number("TKT-12"), None);
        assert_eq!(parse_ticket_number("TIC-000001"), None);
        assert_eq!(parse_ticket_number("TKT-00001a"), None);
        assert_eq!(parse_ticket_number(""), None);
    }

    #[test]
    fn test_ticket_number_roundtrip() {
        for value in [1, 42, 999_999, 1_000_000] {
            assert_eq!(parse_ticket_number(&format_ticket_number(value)), Some(value));
        }
    }
}
