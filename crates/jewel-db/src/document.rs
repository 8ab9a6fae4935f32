//! Documents and the fields the store stamps on them.

use crate::DbError;
use chrono::{SecondsFormat, Utc};
use rand::RngCore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the creation time.
pub const CREATED_AT: &str = "createdAt";
/// Field holding the last update time.
pub const UPDATED_AT: &str = "updatedAt";

/// Document fields, keyed by name.
pub type Fields = Map<String, Value>;

/// A stored document: an id plus a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Create a document from its id and fields.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Creation time as stamped by the store.
    pub fn created_at(&self) -> Option<&str> {
        self.get_str(CREATED_AT)
    }

    /// Deserialize into a type, with the id available as `id_field`.
    ///
    /// Products and orders carry their id as `id`; user profiles as `uid`.
    pub fn deserialize_with_id<T: DeserializeOwned>(&self, id_field: &str) -> Result<T, DbError> {
        let mut map = self.fields.clone();
        map.insert(id_field.to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(map))
            .map_err(|e| DbError::DeserializeError(format!("{}: {}", self.id, e)))
    }

    /// Deserialize into a type that carries its id as `id`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        self.deserialize_with_id("id")
    }
}

/// Deserialize every document, failing on the first bad one.
pub fn deserialize_all<T: DeserializeOwned>(docs: &[Document]) -> Result<Vec<T>, DbError> {
    docs.iter().map(|doc| doc.deserialize()).collect()
}

/// Serialize a value into document fields.
///
/// The value must serialize to a JSON object. `id`, `createdAt` and
/// `updatedAt` are dropped; the store owns them.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, DbError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            map.remove(CREATED_AT);
            map.remove(UPDATED_AT);
            Ok(map)
        }
        other => Err(DbError::Validation(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

/// Generate a random 20-character document id.
pub fn generate_id() -> String {
    use base64::Engine;
    let mut bytes = [0u8; 15];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Current time in the format the store stamps.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_generated_ids_are_url_safe() {
        let id = generate_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(generate_id(), id);
    }

    #[test]
    fn test_deserialize_injects_id() {
        let doc = Document::new("n1", fields(json!({"text": "hello"})));
        let note: Note = doc.deserialize().unwrap();
        assert_eq!(note, Note { id: "n1".into(), text: "hello".into() });
    }

    #[test]
    fn test_to_fields_strips_store_fields() {
        let note = Note { id: "n1".into(), text: "hi".into() };
        let map = to_fields(&note).unwrap();
        assert!(map.get("id").is_none());
        assert_eq!(map["text"], "hi");

        assert!(to_fields(&42).is_err());
    }

    #[test]
    fn test_document_json_is_flat() {
        let doc = Document::new("n1", fields(json!({"text": "hello"})));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"id": "n1", "text": "hello"}));
    }
}
