//! JSON Schema validator backed by the `jsonschema` crate.

use async_trait::async_trait;
use serde_json::Value;

use super::{BoxError, PathSegment, RawValidation, SchemaIssue, SchemaValidator};

/// A reusable JSON Schema validator.
///
/// Compiles the schema once; validating returns the input unchanged on
/// success (JSON Schema does not transform values).
pub struct JsonSchema {
    validator: jsonschema::Validator,
}

impl JsonSchema {
    pub fn new(schema: &Value) -> Result<Self, BoxError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| format!("invalid JSON Schema: {e}"))?;
        Ok(Self { validator })
    }
}

impl std::fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonSchema")
    }
}

#[async_trait]
impl SchemaValidator for JsonSchema {
    async fn validate(&self, input: &Value) -> Result<RawValidation, BoxError> {
        let issues: Vec<SchemaIssue> = self
            .validator
            .iter_errors(input)
            .map(|error| SchemaIssue {
                message: error.to_string(),
                path: Some(pointer_segments(&error.instance_path.to_string())),
            })
            .collect();

        if issues.is_empty() {
            Ok(RawValidation::Value(input.clone()))
        } else {
            Ok(RawValidation::Issues(issues))
        }
    }
}

/// Convert a JSON Pointer ("/user/0/name") into path segments. The root
/// pointer maps to an empty path, which the dot-path renderer drops.
fn pointer_segments(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| {
            let unescaped = raw.replace("~1", "/").replace("~0", "~");
            match unescaped.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(unescaped),
            }
        })
        .collect()
}
