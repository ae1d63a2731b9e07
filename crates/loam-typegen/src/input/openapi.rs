//! OpenAPI 3.x document loader.
//!
//! Extracts the named definitions under `#/components/schemas` and defers to
//! the JSON Schema node parser for each one.

use serde_json::Value;

use crate::document::{SchemaDocument, SchemaLoadError};

use super::jsonschema::collect_definitions;

/// Parse an OpenAPI 3.x document into a [`SchemaDocument`].
pub fn parse_openapi_document(input: &Value) -> Result<SchemaDocument, SchemaLoadError> {
    let version = input.get("openapi").and_then(Value::as_str).unwrap_or("");
    if !version.starts_with("3.") {
        return Err(SchemaLoadError::Malformed(format!(
            "OpenAPI version `{version}` not supported (expected 3.x)"
        )));
    }

    let mut pairs = Vec::new();
    if let Some(schemas) = input.pointer("/components/schemas") {
        collect_definitions(schemas, "components/schemas", &mut pairs)?;
    }
    SchemaDocument::from_definitions(pairs)
}
