//! The schema document: an immutable index of named raw definitions.
//!
//! A [`RawDefinition`] is the as-parsed shape of one schema node, with its
//! kind decided exactly once at load time. Everything downstream (resolution,
//! flattening, mapping) works on this closed enum; no dynamic JSON inspection
//! happens past this point.

use std::collections::BTreeMap;

use crate::ir::{ScalarFormat, ScalarKind};

/// Immutable mapping of unique definition name to its raw definition.
///
/// Built once per run via the loaders in [`crate::input`]; read-only after.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    definitions: BTreeMap<String, RawDefinition>,
}

/// Error raised while building a [`SchemaDocument`].
///
/// Fatal for the whole run: nothing is generated from a document that fails
/// to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("malformed schema document: {0}")]
    Malformed(String),

    #[error("duplicate definition name `{0}`")]
    DuplicateName(String),
}

impl SchemaDocument {
    /// Build a document from `(name, definition)` pairs.
    ///
    /// Rejects the second occurrence of any name with
    /// [`SchemaLoadError::DuplicateName`].
    pub fn from_definitions(
        pairs: impl IntoIterator<Item = (String, RawDefinition)>,
    ) -> Result<Self, SchemaLoadError> {
        let mut definitions = BTreeMap::new();
        for (name, def) in pairs {
            if definitions.contains_key(&name) {
                return Err(SchemaLoadError::DuplicateName(name));
            }
            definitions.insert(name, def);
        }
        Ok(Self { definitions })
    }

    /// Look up a definition by name.
    pub fn lookup(&self, name: &str) -> Option<&RawDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Definition names in deterministic (lexicographic) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// One schema node, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDefinition {
    Object(RawObject),
    Enum(RawEnum),
    Scalar(RawScalar),
    Array(RawArray),
    Reference(RawReference),
    Composition(RawComposition),
    /// Anything the loader could not place in the closed set above.
    /// Classification turns this into an unsupported-shape finding.
    Other(RawOther),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawObject {
    /// Property name -> schema, in deterministic order.
    pub properties: BTreeMap<String, RawDefinition>,
    /// Names listed as required, as written (may dangle).
    pub required: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEnum {
    /// Values as written; non-string values are rejected at classification.
    pub values: Vec<serde_json::Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawScalar {
    pub kind: ScalarKind,
    pub format: Option<ScalarFormat>,
    /// Carried as metadata only, never enforced.
    pub pattern: Option<String>,
    pub max_length: Option<u64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawArray {
    pub items: Box<RawDefinition>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawReference {
    /// Target definition name (pointer prefix already stripped).
    pub target: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    AllOf,
    OneOf,
    AnyOf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawComposition {
    pub kind: CompositionKind,
    pub members: Vec<RawDefinition>,
    /// Explicit discriminator property name, when the document names one.
    pub discriminator: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawOther {
    pub detail: String,
}

impl RawDefinition {
    pub fn description(&self) -> Option<&str> {
        match self {
            RawDefinition::Object(o) => o.description.as_deref(),
            RawDefinition::Enum(e) => e.description.as_deref(),
            RawDefinition::Scalar(s) => s.description.as_deref(),
            RawDefinition::Array(a) => a.description.as_deref(),
            RawDefinition::Reference(r) => r.description.as_deref(),
            RawDefinition::Composition(c) => c.description.as_deref(),
            RawDefinition::Other(_) => None,
        }
    }

    /// Structural equality, ignoring descriptions at every level.
    ///
    /// Used by the allOf flattener: two members may declare the same property
    /// with different doc text and still merge cleanly.
    pub fn same_shape(&self, other: &RawDefinition) -> bool {
        use RawDefinition::*;
        match (self, other) {
            (Object(a), Object(b)) => {
                a.required == b.required
                    && a.properties.len() == b.properties.len()
                    && a.properties.iter().zip(b.properties.iter()).all(
                        |((ka, va), (kb, vb))| ka == kb && va.same_shape(vb),
                    )
            }
            (Enum(a), Enum(b)) => a.values == b.values,
            (Scalar(a), Scalar(b)) => {
                a.kind == b.kind
                    && a.format == b.format
                    && a.pattern == b.pattern
                    && a.max_length == b.max_length
            }
            (Array(a), Array(b)) => a.items.same_shape(&b.items),
            (Reference(a), Reference(b)) => a.target == b.target,
            (Composition(a), Composition(b)) => {
                a.kind == b.kind
                    && a.discriminator == b.discriminator
                    && a.members.len() == b.members.len()
                    && a.members
                        .iter()
                        .zip(b.members.iter())
                        .all(|(x, y)| x.same_shape(y))
            }
            (Other(a), Other(b)) => a.detail == b.detail,
            _ => false,
        }
    }
}
