//! Append-only audit trail models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use super::actor::ActorContext;
use super::entity_kind::EntityKind;

/// Audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    View,
    Export,
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            "LOGIN" => Ok(AuditAction::Login),
            "LOGOUT" => Ok(AuditAction::Logout),
            "VIEW" => Ok(AuditAction::View),
            "EXPORT" => Ok(AuditAction::Export),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::View => "VIEW",
            AuditAction::Export => "EXPORT",
        };
        write!(f, "{}", s)
    }
}

/// Old/new value pair for a single changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Option<JsonValue>,
    pub new: Option<JsonValue>,
}

impl FieldChange {
    pub fn new(old: Option<JsonValue>, new: Option<JsonValue>) -> Self {
        Self { old, new }
    }
}

/// One immutable audit trail entry. `username` is a snapshot taken at
/// write time and `entity_kind` is stored as text, so entries stay
/// readable after the user or the kind itself is gone.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub action: AuditAction,
    pub entity_kind: String,
    pub entity_id: Option<String>,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub changes: Option<HashMap<String, FieldChange>>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub action: AuditAction,
    pub entity_kind: EntityKind,
    pub entity_id: Option<String>,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub changes: Option<HashMap<String, FieldChange>>,
}

impl NewAuditEntry {
    /// Start a new entry. The actor and entity id are attached with the
    /// `with_*` methods.
    pub fn new(action: AuditAction, entity_kind: EntityKind, description: impl Into<String>) -> Self {
        Self {
            user_id: None,
            username: None,
            action,
            entity_kind,
            entity_id: None,
            description: description.into(),
            ip_address: None,
            user_agent: None,
            request_id: None,
            changes: None,
        }
    }

    /// Attach the acting user and their request context.
    pub fn with_actor(mut self, actor: &ActorContext) -> Self {
        self.user_id = Some(actor.user_id);
        self.username = Some(actor.username.clone());
        self.ip_address = actor.ip_address.clone();
        self.user_agent = actor.user_agent.clone();
        self.request_id = actor.request_id.clone();
        self
    }

    /// Set the affected entity's id.
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Set the full change map.
    pub fn with_changes(mut self, changes: HashMap<String, FieldChange>) -> Self {
        self.changes = Some(changes);
        self
    }

    /// Add a single field change.
    pub fn add_change(
        mut self,
        field: impl Into<String>,
        old: Option<JsonValue>,
        new: Option<JsonValue>,
    ) -> Self {
        let changes = self.changes.get_or_insert_with(HashMap::new);
        changes.insert(field.into(), FieldChange::new(old, new));
        self
    }
}

/// Query parameters for browsing the audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAuditLogsQuery {
    pub search: Option<String>,
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub entity_kind: Option<EntityKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    #[test]
    fn test_audit_action_roundtrip() {
        for a in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Login,
            AuditAction::Logout,
            AuditAction::View,
            AuditAction::Export,
        ] {
            assert_eq!(AuditAction::from_str(&a.to_string()).unwrap(), a);
        }
        assert!(AuditAction::from_str("PATCH").is_err());
    }

    #[test]
    fn test_new_entry_builder() {
        let actor = ActorContext {
            user_id: Uuid::new_v4(),
            username: "es.novak".to_string(),
            role: UserRole::ItOfficer,
            branch_id: None,
            ip_address: Some("10.1.4.20".to_string()),
            user_agent: Some("curl/8.5".to_string()),
            request_id: Some("req-77".to_string()),
        };

        let entry = NewAuditEntry::new(
            AuditAction::Update,
            EntityKind::SupportTicket,
            "Updated ticket TKT-000101",
        )
        .with_actor(&actor)
        .with_entity_id("00000000-0000-0000-0000-000000000042")
        .add_change(
            "status",
            Some(serde_json::json!("OPEN")),
            Some(serde_json::json!("IN_PROGRESS")),
        );

        assert_eq!(entry.user_id, Some(actor.user_id));
        assert_eq!(entry.username.as_deref(), Some("es.novak"));
        assert_eq!(entry.ip_address.as_deref(), Some("10.1.4.20"));
        assert_eq!(entry.request_id.as_deref(), Some("req-77"));
        assert_eq!(entry.entity_kind, EntityKind::SupportTicket);
        let changes = entry.changes.unwrap();
        assert_eq!(
            changes["status"].new,
            Some(serde_json::json!("IN_PROGRESS"))
        );
    }

    #[test]
    fn test_entry_without_actor_is_anonymous() {
        let entry = NewAuditEntry::new(
            AuditAction::Login,
            EntityKind::User,
            "Failed login for unknown user",
        );
        assert!(entry.user_id.is_none());
        assert!(entry.username.is_none());
        assert!(entry.changes.is_none());
    }

    #[test]
    fn test_field_change_survives_json_roundtrip() {
        let change = FieldChange::new(None, Some(serde_json::json!(42)));
        let encoded = serde_json::to_string(&change).unwrap();
        let decoded: FieldChange = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, change);
    }
}
