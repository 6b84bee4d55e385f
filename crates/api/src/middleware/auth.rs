//! Session authentication middleware.
//!
//! Resolves the Bearer token in the Authorization header to a stored
//! session and loads the owning user. The resulting [`ActorContext`] is
//! placed in request extensions for handlers and the audit trail.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::RequestId;
use domain::models::ActorContext;
use persistence::repositories::SessionRepository;
use shared::crypto::sha256_hex;

/// Middleware that requires session authentication.
///
/// Validates the Bearer token against stored sessions and rejects
/// requests without a live session or with a deactivated user. Expired
/// sessions are removed on lookup.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let token_hash = sha256_hex(token);
    let sessions = SessionRepository::new(state.pool.clone());

    let user = match sessions
        .find_user_by_token_hash(&token_hash, Utc::now())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return unauthorized_response("Invalid or expired session token");
        }
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed");
            return ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
                .into_response();
        }
    };

    if !user.is_active {
        return unauthorized_response("User account is deactivated");
    }

    let ip_address = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string());
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());

    let actor =
        ActorContext::from_user(&user).with_request_meta(ip_address, user_agent, request_id);

    // Store actor info in request extensions
    req.extensions_mut().insert(actor);
    next.run(req).await
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unauthorized_response_expired_session() {
        let response = unauthorized_response("Invalid or expired session token");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
