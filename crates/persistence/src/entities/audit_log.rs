//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{AuditAction, AuditLog};

/// Database row mapping for the audit_logs table. `changes` is stored
/// as JSONB; rows whose payload does not decode to a change map are
/// surfaced with `changes: None` rather than failing the read.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub action: String,
    pub entity_kind: String,
    pub entity_id: Option<String>,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub changes: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntity> for AuditLog {
    fn from(entity: AuditLogEntity) -> Self {
        let changes = entity
            .changes
            .and_then(|value| serde_json::from_value(value).ok());
        Self {
            id: entity.id,
            user_id: entity.user_id,
            username: entity.username,
            action: entity.action.parse().unwrap_or(AuditAction::View),
            entity_kind: entity.entity_kind,
            entity_id: entity.entity_id,
            description: entity.description,
            ip_address: entity.ip_address,
            user_agent: entity.user_agent,
            request_id: entity.request_id,
            changes,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(changes: Option<JsonValue>) -> AuditLogEntity {
        AuditLogEntity {
            id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            username: Some("ops".to_string()),
            action: "UPDATE".to_string(),
            entity_kind: "SUPPORT_TICKET".to_string(),
            entity_id: Some(Uuid::new_v4().to_string()),
            description: "Updated ticket TKT-000007".to_string(),
            ip_address: None,
            user_agent: None,
            request_id: None,
            changes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_audit_entity_to_domain() {
        let entity = sample(Some(json!({
            "status": {"old": "OPEN", "new": "IN_PROGRESS"}
        })));

        let log: AuditLog = entity.into();
        assert_eq!(log.action, AuditAction::Update);
        assert_eq!(log.entity_kind, "SUPPORT_TICKET");
        let changes = log.changes.unwrap();
        assert_eq!(changes["status"].new, Some(json!("IN_PROGRESS")));
    }

    #[test]
    fn test_undecodable_changes_become_none() {
        let entity = sample(Some(json!("not a map")));
        let log: AuditLog = entity.into();
        assert!(log.changes.is_none());
    }

    #[test]
    fn test_unknown_action_falls_back_to_view() {
        let mut entity = sample(None);
        entity.action = "PATCH".to_string();
        let log: AuditLog = entity.into();
        assert_eq!(log.action, AuditAction::View);
    }
}
