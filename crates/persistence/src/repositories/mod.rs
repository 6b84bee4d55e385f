//! Repository implementations for database operations.

pub mod alert;
pub mod atm;
pub mod audit_log;
pub mod branch;
pub mod dashboard;
pub mod monitored_system;
pub mod performance_report;
pub mod pos_terminal;
pub mod security_event;
pub mod session;
pub mod support_ticket;
pub mod ticket_comment;
pub mod user;

pub use alert::AlertRepository;
pub use atm::AtmRepository;
pub use audit_log::AuditLogRepository;
pub use branch::BranchRepository;
pub use dashboard::DashboardRepository;
pub use monitored_system::MonitoredSystemRepository;
pub use performance_report::PerformanceReportRepository;
pub use pos_terminal::PosTerminalRepository;
pub use security_event::SecurityEventRepository;
pub use session::SessionRepository;
pub use support_ticket::SupportTicketRepository;
pub use ticket_comment::TicketCommentRepository;
pub use user::UserRepository;
