//! Operator account administration.
//!
//! All user management is administrator-only. Responses carry
//! [`UserResponse`], never the stored hash.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActorContext, AuditAction, CreateUserRequest, EntityKind, ListUsersQuery, NewAuditEntry,
    UpdateUserRequest, UserResponse,
};
use domain::services::{entity_changes, Action};
use persistence::repositories::{AuditLogRepository, SessionRepository, UserRepository};
use shared::pagination::{Page, PageParams};
use shared::password::hash_password;

use super::{authorize, ServiceError};

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    sessions: SessionRepository,
    audit: AuditLogRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        authorize(actor, Action::Create, EntityKind::User)?;
        request.validate()?;

        if self.users.username_exists(&request.username).await? {
            return Err(ServiceError::Conflict(format!(
                "Username {} is already taken",
                request.username
            )));
        }
        if let Some(employee_id) = &request.employee_id {
            if self.users.employee_id_exists(employee_id, None).await? {
                return Err(ServiceError::Conflict(format!(
                    "Employee id {} is already in use",
                    employee_id
                )));
            }
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self.users.create(&request, &password_hash).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Create,
                    EntityKind::User,
                    format!("Created user {}", user.username),
                )
                .with_actor(actor)
                .with_entity_id(user.id.to_string()),
            )
            .await;

        Ok(user.into())
    }

    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<UserResponse, ServiceError> {
        authorize(actor, Action::View, EntityKind::User)?;
        self.users
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    pub async fn list(
        &self,
        actor: &ActorContext,
        query: ListUsersQuery,
    ) -> Result<Page<UserResponse>, ServiceError> {
        authorize(actor, Action::View, EntityKind::User)?;
        let params = PageParams::new(query.page, query.per_page);
        let (items, total) = self.users.list(&query).await?;
        Ok(Page::new(items, params, total).map(UserResponse::from))
    }

    /// Update a user. Usernames and passwords are fixed here; password
    /// changes go through a separate credential flow.
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        authorize(actor, Action::Update, EntityKind::User)?;
        request.validate()?;

        let before = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        let was_active = before.is_active;

        if let Some(Some(employee_id)) = &request.employee_id {
            if self.users.employee_id_exists(employee_id, Some(id)).await? {
                return Err(ServiceError::Conflict(format!(
                    "Employee id {} is already in use",
                    employee_id
                )));
            }
        }

        let user = self
            .users
            .update(id, &request)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        // Deactivation ends the user's live sessions immediately.
        if was_active && !user.is_active {
            let revoked = self.sessions.revoke_for_user(id).await?;
            tracing::info!(
                user_id = %id,
                sessions = revoked,
                "User deactivated, sessions revoked"
            );
        }

        let before_view = UserResponse::from(before);
        let after_view = UserResponse::from(user);

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Update,
                    EntityKind::User,
                    format!("Updated user {}", after_view.username),
                )
                .with_actor(actor)
                .with_entity_id(after_view.id.to_string())
                .with_changes(entity_changes(&before_view, &after_view)),
            )
            .await;

        Ok(after_view)
    }

    /// Delete a user. Authored records survive with their author links
    /// cleared; the repository handles the fan-out and drops sessions.
    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), ServiceError> {
        authorize(actor, Action::Delete, EntityKind::User)?;

        let before = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if !self.users.delete(id).await? {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = %id, username = %before.username, "User deleted");

        self.audit
            .record(
                &NewAuditEntry::new(
                    AuditAction::Delete,
                    EntityKind::User,
                    format!("Deleted user {}", before.username),
                )
                .with_actor(actor)
                .with_entity_id(id.to_string()),
            )
            .await;

        Ok(())
    }
}
