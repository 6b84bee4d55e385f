use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_auth, security_headers_middleware, trace_id,
};
use crate::routes::{
    alerts, atms, audit_logs, auth, branches, dashboard, health, monitored_systems,
    performance_reports, pos_terminals, security_events, support_tickets, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a session token)
    let protected_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        // Branches
        .route(
            "/api/v1/branches",
            post(branches::create_branch).get(branches::list_branches),
        )
        .route(
            "/api/v1/branches/:id",
            get(branches::get_branch)
                .patch(branches::update_branch)
                .delete(branches::delete_branch),
        )
        // ATMs
        .route("/api/v1/atms", post(atms::create_atm).get(atms::list_atms))
        .route(
            "/api/v1/atms/:id",
            get(atms::get_atm)
                .patch(atms::update_atm)
                .delete(atms::delete_atm),
        )
        // POS terminals
        .route(
            "/api/v1/pos-terminals",
            post(pos_terminals::create_pos_terminal).get(pos_terminals::list_pos_terminals),
        )
        .route(
            "/api/v1/pos-terminals/:id",
            get(pos_terminals::get_pos_terminal)
                .patch(pos_terminals::update_pos_terminal)
                .delete(pos_terminals::delete_pos_terminal),
        )
        // Monitored systems
        .route(
            "/api/v1/systems",
            post(monitored_systems::create_monitored_system)
                .get(monitored_systems::list_monitored_systems),
        )
        .route(
            "/api/v1/systems/:id",
            get(monitored_systems::get_monitored_system)
                .patch(monitored_systems::update_monitored_system)
                .delete(monitored_systems::delete_monitored_system),
        )
        // Support tickets and their comments
        .route(
            "/api/v1/tickets",
            post(support_tickets::create_ticket).get(support_tickets::list_tickets),
        )
        .route(
            "/api/v1/tickets/:id",
            get(support_tickets::get_ticket)
                .patch(support_tickets::update_ticket)
                .delete(support_tickets::delete_ticket),
        )
        .route(
            "/api/v1/tickets/:id/comments",
            post(support_tickets::create_ticket_comment).get(support_tickets::list_ticket_comments),
        )
        .route(
            "/api/v1/tickets/:ticket_id/comments/:comment_id",
            delete(support_tickets::delete_ticket_comment),
        )
        // Security events
        .route(
            "/api/v1/security-events",
            post(security_events::create_security_event).get(security_events::list_security_events),
        )
        .route(
            "/api/v1/security-events/:id",
            get(security_events::get_security_event)
                .patch(security_events::update_security_event)
                .delete(security_events::delete_security_event),
        )
        // Alerts
        .route(
            "/api/v1/alerts",
            post(alerts::create_alert).get(alerts::list_alerts),
        )
        .route(
            "/api/v1/alerts/:id",
            get(alerts::get_alert)
                .patch(alerts::update_alert)
                .delete(alerts::delete_alert),
        )
        // Performance reports
        .route(
            "/api/v1/reports",
            post(performance_reports::create_report).get(performance_reports::list_reports),
        )
        .route(
            "/api/v1/reports/:id",
            get(performance_reports::get_report)
                .patch(performance_reports::update_report)
                .delete(performance_reports::delete_report),
        )
        // Users
        .route(
            "/api/v1/users",
            post(users::create_user).get(users::list_users),
        )
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Audit trail (read-only)
        .route("/api/v1/audit-logs", get(audit_logs::list_audit_logs))
        .route("/api/v1/audit-logs/:id", get(audit_logs::get_audit_log))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
