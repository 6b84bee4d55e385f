//! Authenticated actor extractor.
//!
//! Pulls the [`ActorContext`] placed in request extensions by the session
//! middleware. Handlers take `Actor(actor)` as an argument instead of
//! touching extensions directly.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use domain::models::ActorContext;

/// The authenticated operator for the current request.
///
/// Rejects with 401 when no session middleware ran on the route. All
/// `/api/v1` routes are behind `require_auth`, so in practice this only
/// fires on a misconfigured router.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActorContext>()
            .cloned()
            .map(Actor)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use domain::models::UserRole;
    use uuid::Uuid;

    fn sample_context() -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "mhorak".to_string(),
            role: UserRole::BranchManager,
            branch_id: None,
            ip_address: None,
            user_agent: None,
            request_id: None,
        }
    }

    #[tokio::test]
    async fn test_actor_extracted_from_extensions() {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(sample_context());
        let (mut parts, _) = request.into_parts();

        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.0.username, "mhorak");
        assert_eq!(actor.0.role, UserRole::BranchManager);
    }

    #[tokio::test]
    async fn test_actor_missing_is_unauthorized() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = Actor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
