//! Resolved intermediate representation.
//!
//! Resolution turns raw definitions into this closed union. Graphs are kept
//! finite by construction: a field whose type is another named definition is
//! stored as [`ResolvedType::Ref`] (a name-based back-reference into the
//! run's resolution index), never as an inlined copy. Two definitions that
//! reference each other are therefore just two index entries pointing at each
//! other.

use serde::{Deserialize, Serialize};

/// A fully resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolvedType {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    Array(Box<ResolvedType>),
    /// Name-based reference to another definition. Also the resolved form of
    /// an alias definition (one that is nothing but a reference).
    Ref(String),
    Variant(VariantType),
}

/// Primitive scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// Recognized `format` refinements on string scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarFormat {
    Date,
    DateTime,
    Uri,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    pub kind: ScalarKind,
    pub format: Option<ScalarFormat>,
    /// Constraint metadata, carried through but never enforced.
    pub pattern: Option<String>,
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Final target identifier.
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Property name as written in the schema.
    pub name: String,
    pub ty: ResolvedType,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    /// Final target identifier.
    pub name: String,
    pub members: Vec<EnumMember>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    /// The original wire string. Always retained, so renaming a member never
    /// loses round-trip fidelity.
    pub wire_value: String,
    /// Derived target identifier, unique within the enum.
    pub canonical_name: String,
    pub description: Option<String>,
}

/// A closed tagged union produced from oneOf/anyOf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantType {
    /// Final target identifier.
    pub name: String,
    pub branches: Vec<VariantBranch>,
    /// Shared discriminator property, when one exists. `None` selects the
    /// untagged rendering.
    pub discriminator: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantBranch {
    /// Unique label within the variant, derived from the branch type.
    pub label: String,
    pub ty: ResolvedType,
}

/// A wire value that no member of the enum carries.
///
/// Raised only against live data at codec-usage time, never during
/// generation: a producer may add enum values before its consumers
/// regenerate, and decoding must fail deterministically rather than guess.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wire value `{0}`")]
pub struct UnknownEnumValue(pub String);

impl EnumType {
    /// Decode a wire string into its member.
    pub fn decode(&self, wire: &str) -> Result<&EnumMember, UnknownEnumValue> {
        self.members
            .iter()
            .find(|m| m.wire_value == wire)
            .ok_or_else(|| UnknownEnumValue(wire.to_string()))
    }

    /// Encode a member back to its wire string.
    pub fn encode<'a>(&self, member: &'a EnumMember) -> &'a str {
        &member.wire_value
    }

    /// Look up a member by canonical name.
    pub fn member(&self, canonical_name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.canonical_name == canonical_name)
    }
}

impl ResolvedType {
    /// The target identifier of a named type, if this node carries one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ResolvedType::Object(o) => Some(&o.name),
            ResolvedType::Enum(e) => Some(&e.name),
            ResolvedType::Variant(v) => Some(&v.name),
            ResolvedType::Ref(name) => Some(name),
            ResolvedType::Scalar(_) | ResolvedType::Array(_) => None,
        }
    }
}
