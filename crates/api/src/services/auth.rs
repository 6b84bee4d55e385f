//! Login and logout.
//!
//! Tokens are opaque random values; the database only ever sees their
//! SHA-256. Failed logins return [`ServiceError::InvalidCredentials`]
//! without distinguishing unknown usernames from wrong passwords, and
//! leave no audit trace.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, EntityKind, LoginRequest, NewAuditEntry, UserResponse,
};
use persistence::repositories::{AuditLogRepository, SessionRepository, UserRepository};
use shared::crypto::{generate_session_token, sha256_hex, token_prefix};
use shared::password::verify_password;

use super::ServiceError;

/// Outcome of a successful login.
pub struct LoginResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
    audit: AuditLogRepository,
    session_ttl_secs: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, session_ttl_secs: i64) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
            session_ttl_secs,
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// The request metadata travels into the LOGIN audit entry; the
    /// middleware has no actor yet at this point, so the entry is built
    /// from the freshly authenticated user.
    pub async fn login(
        &self,
        request: LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
        request_id: Option<String>,
    ) -> Result<LoginResult, ServiceError> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let password_ok = verify_password(&request.password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Password verification failed: {}", e)))?;
        if !password_ok {
            tracing::warn!(username = %request.username, "Login rejected: bad password");
            return Err(ServiceError::InvalidCredentials);
        }
        if !user.is_active {
            tracing::warn!(username = %request.username, "Login rejected: account deactivated");
            return Err(ServiceError::UserDisabled);
        }

        let token = generate_session_token();
        let token_hash = sha256_hex(&token);
        let expires_at = Utc::now() + Duration::seconds(self.session_ttl_secs);
        self.sessions.create(user.id, &token_hash, expires_at).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            token_prefix = token_prefix(&token),
            "User logged in"
        );

        let actor =
            ActorContext::from_user(&user).with_request_meta(ip_address, user_agent, request_id);
        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Login,
                    EntityKind::User,
                    format!("User {} logged in", user.username),
                )
                .with_actor(&actor)
                .with_entity_id(user.id.to_string()),
            )
            .await;

        Ok(LoginResult {
            token,
            expires_at,
            user: user.into(),
        })
    }

    /// Revoke the presented session token.
    ///
    /// Idempotent: a token that is already gone is not an error. The
    /// LOGOUT audit entry is only written when a session was actually
    /// revoked.
    pub async fn logout(&self, actor: &ActorContext, token: &str) -> Result<(), ServiceError> {
        let revoked = self.sessions.revoke(&sha256_hex(token)).await?;
        if revoked {
            tracing::info!(user_id = %actor.user_id, username = %actor.username, "User logged out");
            self.audit
                .record(
                    &NewAuditEntry::new(
                        AuditAction::Logout,
                        EntityKind::User,
                        format!("User {} logged out", actor.username),
                    )
                    .with_actor(actor)
                    .with_entity_id(actor.user_id.to_string()),
                )
                .await;
        }
        Ok(())
    }
}
