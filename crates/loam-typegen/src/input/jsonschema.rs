//! JSON Schema document loader.

use serde_json::Value;

use crate::document::{
    CompositionKind, RawArray, RawComposition, RawDefinition, RawEnum, RawObject, RawOther,
    RawReference, RawScalar, SchemaDocument, SchemaLoadError,
};
use crate::ir::{ScalarFormat, ScalarKind};

/// Parse a JSON Schema style document into a [`SchemaDocument`].
///
/// Definitions are collected from `$defs` and `definitions`; a document with
/// neither container is treated as a bare `{name: definition}` map. A name
/// contributed twice (e.g. by both containers) fails with
/// [`SchemaLoadError::DuplicateName`].
pub fn parse_schema_document(input: &Value) -> Result<SchemaDocument, SchemaLoadError> {
    let root = input
        .as_object()
        .ok_or_else(|| SchemaLoadError::Malformed("top level must be an object".into()))?;

    let mut pairs = Vec::new();
    let mut saw_container = false;
    for container in ["$defs", "definitions"] {
        if let Some(defs) = root.get(container) {
            saw_container = true;
            collect_definitions(defs, container, &mut pairs)?;
        }
    }

    if !saw_container {
        collect_definitions(input, "document", &mut pairs)?;
    }

    SchemaDocument::from_definitions(pairs)
}

pub(super) fn collect_definitions(
    container: &Value,
    label: &str,
    pairs: &mut Vec<(String, RawDefinition)>,
) -> Result<(), SchemaLoadError> {
    let map = container.as_object().ok_or_else(|| {
        SchemaLoadError::Malformed(format!("{label} must be an object of definitions"))
    })?;
    for (name, node) in map {
        pairs.push((name.clone(), parse_node(node)?));
    }
    Ok(())
}

/// Parse one schema node into its raw kind.
///
/// Dispatch order mirrors classification priority: reference, enum,
/// composition, object, array, primitive. Shapes outside the closed set
/// become [`RawDefinition::Other`] so classification can report them
/// per-definition instead of failing the whole load.
pub(super) fn parse_node(node: &Value) -> Result<RawDefinition, SchemaLoadError> {
    let obj = node
        .as_object()
        .ok_or_else(|| SchemaLoadError::Malformed("definition must be an object".into()))?;

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(String::from);

    if let Some(reference) = obj.get("$ref") {
        let target = reference
            .as_str()
            .ok_or_else(|| SchemaLoadError::Malformed("$ref must be a string".into()))?;
        return Ok(RawDefinition::Reference(RawReference {
            target: strip_pointer(target),
            description,
        }));
    }

    if let Some(values) = obj.get("enum") {
        let values = values
            .as_array()
            .ok_or_else(|| SchemaLoadError::Malformed("enum must be an array".into()))?;
        return Ok(RawDefinition::Enum(RawEnum {
            values: values.clone(),
            description,
        }));
    }

    for (key, kind) in [
        ("allOf", CompositionKind::AllOf),
        ("oneOf", CompositionKind::OneOf),
        ("anyOf", CompositionKind::AnyOf),
    ] {
        if let Some(members) = obj.get(key) {
            let members = members
                .as_array()
                .ok_or_else(|| SchemaLoadError::Malformed(format!("{key} must be an array")))?;
            let discriminator = obj
                .get("discriminator")
                .and_then(|d| d.get("propertyName"))
                .and_then(Value::as_str)
                .map(String::from);
            return Ok(RawDefinition::Composition(RawComposition {
                kind,
                members: members
                    .iter()
                    .map(parse_node)
                    .collect::<Result<Vec<_>, _>>()?,
                discriminator,
                description,
            }));
        }
    }

    let type_name = obj.get("type").and_then(Value::as_str);

    if type_name == Some("object") || (type_name.is_none() && obj.contains_key("properties")) {
        let mut properties = std::collections::BTreeMap::new();
        if let Some(props) = obj.get("properties").and_then(Value::as_object) {
            for (prop, schema) in props {
                properties.insert(prop.clone(), parse_node(schema)?);
            }
        }
        let required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        return Ok(RawDefinition::Object(RawObject {
            properties,
            required,
            description,
        }));
    }

    if type_name == Some("array") {
        return match obj.get("items") {
            Some(items) => Ok(RawDefinition::Array(RawArray {
                items: Box::new(parse_node(items)?),
                description,
            })),
            None => Ok(RawDefinition::Other(RawOther {
                detail: "array without items".into(),
            })),
        };
    }

    if let Some(kind) = type_name.and_then(scalar_kind) {
        return Ok(RawDefinition::Scalar(RawScalar {
            kind,
            format: obj.get("format").and_then(Value::as_str).and_then(format_of),
            pattern: obj.get("pattern").and_then(Value::as_str).map(String::from),
            max_length: obj.get("maxLength").and_then(Value::as_u64),
            description,
        }));
    }

    let detail = match type_name {
        Some(other) => format!("unrecognized type `{other}`"),
        None => format!(
            "unrecognized definition shape (keys: {})",
            obj.keys().cloned().collect::<Vec<_>>().join(", ")
        ),
    };
    Ok(RawDefinition::Other(RawOther { detail }))
}

fn scalar_kind(name: &str) -> Option<ScalarKind> {
    match name {
        "string" => Some(ScalarKind::String),
        "integer" => Some(ScalarKind::Integer),
        "number" => Some(ScalarKind::Number),
        "boolean" => Some(ScalarKind::Boolean),
        _ => None,
    }
}

fn format_of(name: &str) -> Option<ScalarFormat> {
    match name {
        "date" => Some(ScalarFormat::Date),
        "date-time" => Some(ScalarFormat::DateTime),
        "uri" => Some(ScalarFormat::Uri),
        _ => None,
    }
}

/// `#/$defs/State`, `#/definitions/State`, `#/components/schemas/State`, and
/// a bare `State` all point at the definition named `State`.
fn strip_pointer(reference: &str) -> String {
    reference.rsplit('/').next().unwrap_or(reference).to_string()
}
