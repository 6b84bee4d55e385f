//! Login and logout endpoint handlers.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use domain::models::{LoginRequest, UserResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::middleware::trace_id::RequestId;
use crate::services::AuthService;

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Authenticate and receive a session token.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let ip_address = client_ip(&headers);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let request_id = request_id.map(|Extension(id)| id.0);

    let result = AuthService::new(state.pool.clone(), state.config.auth.session_ttl_secs)
        .login(request, ip_address, user_agent, request_id)
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        expires_at: result.expires_at,
        user: result.user,
    }))
}

/// Revoke the presented session token.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Actor(actor): Actor,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
) -> Result<StatusCode, ApiError> {
    AuthService::new(state.pool.clone(), state.config.auth.session_ttl_secs)
        .logout(&actor, authorization.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Client address from `X-Forwarded-For`, first hop.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
}
