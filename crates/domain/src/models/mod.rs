//! Domain model definitions.

pub mod actor;
pub mod alert;
pub mod atm;
pub mod audit_log;
pub mod branch;
pub mod dashboard;
pub mod entity_kind;
pub mod monitored_system;
pub mod patch;
pub mod performance_report;
pub mod pos_terminal;
pub mod security_event;
pub mod support_ticket;
pub mod ticket_comment;
pub mod user;

pub use actor::ActorContext;
pub use alert::{Alert, AlertStatus, AlertType, CreateAlertRequest, ListAlertsQuery, UpdateAlertRequest};
pub use atm::{
    Atm, AtmStatus, AtmType, CashBand, CreateAtmRequest, ListAtmsQuery, UpdateAtmRequest,
    CRITICAL_CASH_THRESHOLD, LOW_CASH_THRESHOLD,
};
pub use audit_log::{AuditAction, AuditLog, FieldChange, ListAuditLogsQuery, NewAuditEntry};
pub use branch::{
    Branch, BranchStatus, BranchType, CreateBranchRequest, ListBranchesQuery, UpdateBranchRequest,
};
pub use dashboard::{
    AlertCounts, AtmCounts, BranchCounts, DashboardSummary, SecurityEventCounts, SystemCounts,
    TicketCounts,
};
pub use entity_kind::EntityKind;
pub use monitored_system::{
    CreateMonitoredSystemRequest, ListMonitoredSystemsQuery, MonitoredSystem, SystemStatus,
    SystemType, UpdateMonitoredSystemRequest,
};
pub use performance_report::{
    CreatePerformanceReportRequest, ListPerformanceReportsQuery, PerformanceReport, ReportType,
    UpdatePerformanceReportRequest,
};
pub use pos_terminal::{
    CreatePosTerminalRequest, ListPosTerminalsQuery, PosStatus, PosTerminal, PosType,
    UpdatePosTerminalRequest,
};
pub use security_event::{
    CreateSecurityEventRequest, ListSecurityEventsQuery, SecurityEvent, SecurityEventStatus,
    SecurityEventType, Severity, UpdateSecurityEventRequest,
};
pub use support_ticket::{
    CreateSupportTicketRequest, ListSupportTicketsQuery, SupportTicket, TicketCategory,
    TicketPriority, TicketStatus, UpdateSupportTicketRequest,
};
pub use ticket_comment::{CreateTicketCommentRequest, TicketComment};
pub use user::{
    CreateUserRequest, ListUsersQuery, LoginRequest, UpdateUserRequest, User, UserResponse,
    UserRole,
};
