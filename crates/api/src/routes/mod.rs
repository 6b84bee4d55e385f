//! HTTP route handlers.

pub mod alerts;
pub mod atms;
pub mod audit_logs;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod health;
pub mod monitored_systems;
pub mod performance_reports;
pub mod pos_terminals;
pub mod security_events;
pub mod support_tickets;
pub mod users;
