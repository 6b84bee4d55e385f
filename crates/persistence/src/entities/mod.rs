//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Enum-valued columns
//! are stored as text and parsed on the way out.

pub mod alert;
pub mod atm;
pub mod audit_log;
pub mod branch;
pub mod monitored_system;
pub mod performance_report;
pub mod pos_terminal;
pub mod security_event;
pub mod session;
pub mod support_ticket;
pub mod ticket_comment;
pub mod user;

pub use alert::AlertEntity;
pub use atm::AtmEntity;
pub use audit_log::AuditLogEntity;
pub use branch::BranchEntity;
pub use monitored_system::MonitoredSystemEntity;
pub use performance_report::PerformanceReportEntity;
pub use pos_terminal::PosTerminalEntity;
pub use security_event::SecurityEventEntity;
pub use session::SessionUserEntity;
pub use support_ticket::SupportTicketEntity;
pub use ticket_comment::TicketCommentEntity;
pub use user::UserEntity;
