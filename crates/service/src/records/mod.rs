//! Schema-less JSON records and the store abstraction handlers program against.

pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Field every record carries; assigned by the store.
pub const ID_FIELD: &str = "id";

/// One JSON object of the collection.
///
/// Any fields are allowed; the store guarantees an integer `id`. Field order
/// is kept as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Accept a request body, which must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ServiceError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ServiceError::Validation(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.0.get(ID_FIELD).and_then(Value::as_u64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Shallow merge: every key of `patch` replaces or adds the same key here.
    /// `id` is never taken from the patch.
    pub(crate) fn merge(&mut self, patch: Record) {
        for (key, value) in patch.0 {
            if key == ID_FIELD {
                continue;
            }
            self.0.insert(key, value);
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
