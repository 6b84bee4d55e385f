//! Change-map computation for audit entries.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::models::FieldChange;

/// Fields never reported in audit change maps. `password_hash` must not
/// leak into the trail; `updated_at` changes on every write.
const SKIPPED_FIELDS: [&str; 2] = ["password_hash", "updated_at"];

/// Field-by-field difference between two versions of an entity,
/// suitable for `NewAuditEntry::with_changes`. Unchanged fields are
/// omitted; values that do not serialize to an object yield an empty
/// map.
pub fn entity_changes<T: Serialize>(before: &T, after: &T) -> HashMap<String, FieldChange> {
    let before = match serde_json::to_value(before) {
        Ok(JsonValue::Object(map)) => map,
        _ => return HashMap::new(),
    };
    let after = match serde_json::to_value(after) {
        Ok(JsonValue::Object(map)) => map,
        _ => return HashMap::new(),
    };

    let mut changes = HashMap::new();
    for (key, old_value) in &before {
        if SKIPPED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let new_value = after.get(key);
        if new_value != Some(old_value) {
            changes.insert(
                key.clone(),
                FieldChange::new(Some(old_value.clone()), new_value.cloned()),
            );
        }
    }
    for (key, new_value) in &after {
        if SKIPPED_FIELDS.contains(&key.as_str()) || before.contains_key(key) {
            continue;
        }
        changes.insert(key.clone(), FieldChange::new(None, Some(new_value.clone())));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        status: &'static str,
        priority: &'static str,
        updated_at: &'static str,
    }

    #[test]
    fn test_only_changed_fields_reported() {
        let before = Row {
            status: "OPEN",
            priority: "HIGH",
            updated_at: "2025-07-01T08:00:00Z",
        };
        let after = Row {
            status: "IN_PROGRESS",
            priority: "HIGH",
            updated_at: "2025-07-01T09:30:00Z",
        };

        let changes = entity_changes(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["status"].old, Some(json!("OPEN")));
        assert_eq!(changes["status"].new, Some(json!("IN_PROGRESS")));
    }

    #[test]
    fn test_identical_versions_yield_empty_map() {
        let row = Row {
            status: "OPEN",
            priority: "LOW",
            updated_at: "2025-07-01T08:00:00Z",
        };
        assert!(entity_changes(&row, &row).is_empty());
    }

    #[test]
    fn test_password_hash_never_reported() {
        #[derive(Serialize)]
        struct Account {
            username: &'static str,
            password_hash: &'static str,
        }

        let before = Account {
            username: "m.okafor",
            password_hash: "$argon2id$old",
        };
        let after = Account {
            username: "m.okafor",
            password_hash: "$argon2id$new",
        };
        assert!(entity_changes(&before, &after).is_empty());
    }

    #[test]
    fn test_nullable_field_transitions() {
        #[derive(Serialize)]
        struct Assignment {
            assigned_to: Option<&'static str>,
        }

        let changes = entity_changes(
            &Assignment { assigned_to: None },
            &Assignment {
                assigned_to: Some("a9d2"),
            },
        );
        assert_eq!(changes["assigned_to"].old, Some(json!(null)));
        assert_eq!(changes["assigned_to"].new, Some(json!("a9d2")));
    }

    #[test]
    fn test_non_object_values_yield_empty_map() {
        assert!(entity_changes(&1, &2).is_empty());
    }
}
