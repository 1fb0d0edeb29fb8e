use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single record bound for the store.
///
/// Wraps a JSON object. The store keys every write on a string `id` field;
/// documents arriving without one get a generated id back-filled before any
/// chunk size accounting, since the id contributes to serialized length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The document identifier, if one is set and non-null.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Assign a generated globally-unique id when none is set. Returns true
    /// when an id was generated.
    pub fn ensure_id(&mut self) -> bool {
        let missing = matches!(self.0.get("id"), None | Some(Value::Null));
        if missing {
            self.0.insert(
                "id".to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
        missing
    }

    /// Serialized form submitted to the batch-insert procedure.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).expect("object")
    }

    #[test]
    fn missing_and_null_ids_are_back_filled() {
        let mut without = doc(json!({ "name": "a" }));
        assert!(without.ensure_id());
        assert!(!without.id().expect("id set").is_empty());

        let mut null_id = doc(json!({ "id": null, "name": "b" }));
        assert!(null_id.ensure_id());
        assert!(null_id.id().is_some());
    }

    #[test]
    fn existing_ids_are_preserved() {
        let mut with = doc(json!({ "id": "fixed", "name": "c" }));
        assert!(!with.ensure_id());
        assert_eq!(with.id(), Some("fixed"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut first = doc(json!({}));
        let mut second = doc(json!({}));
        first.ensure_id();
        second.ensure_id();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(Document::from_value(json!([1, 2])).is_none());
        assert!(Document::from_value(json!("scalar")).is_none());
    }
}
