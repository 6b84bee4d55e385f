//! The authenticated actor on whose behalf an operation runs.

use uuid::Uuid;

use super::user::{User, UserRole};

/// Identity and request context threaded explicitly through every core
/// operation.
///
/// Built by the authentication middleware from the session and attached to
/// the request; core operations never read ambient request state.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    /// Branch affiliation, when the user has one (drives branch-scoped
    /// visibility for Branch Managers).
    pub branch_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
}

impl ActorContext {
    /// Builds an actor context from a user record, without request
    /// metadata. Metadata is filled in by the middleware.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            branch_id: user.branch_id,
            ip_address: None,
            user_agent: None,
            request_id: None,
        }
    }

    pub fn with_request_meta(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self.request_id = request_id;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@bank.example".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: "Jane Doe".to_string(),
            role,
            phone: None,
            employee_id: Some("EMP-0042".to_string()),
            branch_id: Some(Uuid::new_v4()),
            department: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_user_copies_identity() {
        let user = sample_user(UserRole::BranchManager);
        let actor = ActorContext::from_user(&user);
        assert_eq!(actor.user_id, user.id);
        assert_eq!(actor.username, "jdoe");
        assert_eq!(actor.role, UserRole::BranchManager);
        assert_eq!(actor.branch_id, user.branch_id);
        assert!(actor.ip_address.is_none());
    }

    #[test]
    fn test_with_request_meta() {
        let user = sample_user(UserRole::Admin);
        let actor = ActorContext::from_user(&user).with_request_meta(
            Some("10.0.0.9".to_string()),
            Some("curl/8.5".to_string()),
            Some("req-1".to_string()),
        );
        assert!(actor.is_admin());
        assert_eq!(actor.ip_address.as_deref(), Some("10.0.0.9"));
        assert_eq!(actor.user_agent.as_deref(), Some("curl/8.5"));
        assert_eq!(actor.request_id.as_deref(), Some("req-1"));
    }
}
