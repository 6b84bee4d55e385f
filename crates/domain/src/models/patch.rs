//! Serde helper for partial-update requests.

use serde::{Deserialize, Deserializer};

/// Deserializes a field that must distinguish "absent" from "explicit
/// null".
///
/// Use with `#[serde(default, deserialize_with = "patch::double_option")]`
/// on an `Option<Option<T>>` field: absent stays `None`, `null` becomes
/// `Some(None)` (clear the column), a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, serde::Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        target: Option<Option<Uuid>>,
    }

    #[test]
    fn test_absent_field() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.target.is_none());
    }

    #[test]
    fn test_explicit_null() {
        let patch: Patch = serde_json::from_str(r#"{"target": null}"#).unwrap();
        assert_eq!(patch.target, Some(None));
    }

    #[test]
    fn test_value() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"target": "{}"}}"#, id);
        let patch: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(patch.target, Some(Some(id)));
    }
}
