use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BuildError;

/// Caller-supplied JSON Schema fragment. Flattening substitutes the wrapped
/// object verbatim at the parent's slot, it is never walked or rewritten.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RawSchema(Map<String, Value>);

impl RawSchema {
    pub fn new(schema: Map<String, Value>) -> Self {
        Self(schema)
    }

    /// A `{"$ref": target}` schema.
    pub fn reference(target: impl Into<String>) -> Self {
        let mut schema = Map::new();
        schema.insert("$ref".to_string(), Value::String(target.into()));
        Self(schema)
    }

    /// A `{"type": type_}` schema, e.g. `RawSchema::of_type("string")`.
    pub fn of_type(type_: impl Into<String>) -> Self {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String(type_.into()));
        Self(schema)
    }

    pub fn schema(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawSchema {
    fn from(schema: Map<String, Value>) -> Self {
        Self(schema)
    }
}

impl TryFrom<Value> for RawSchema {
    type Error = BuildError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(schema) => Ok(Self(schema)),
            Value::Null => Err(BuildError::InvalidRawSchema("null")),
            Value::Bool(_) => Err(BuildError::InvalidRawSchema("boolean")),
            Value::Number(_) => Err(BuildError::InvalidRawSchema("number")),
            Value::String(_) => Err(BuildError::InvalidRawSchema("string")),
            Value::Array(_) => Err(BuildError::InvalidRawSchema("array")),
        }
    }
}
