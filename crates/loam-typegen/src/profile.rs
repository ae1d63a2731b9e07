//! Target-language configuration.
//!
//! A [`TargetProfile`] carries everything emission needs to know about the
//! target type system: the scalar mapping table, the sequence template,
//! casing rules, and the prefix token for numeric-leading identifiers.
//! Profiles are plain data and serialize cleanly, so callers can load them
//! from configuration instead of hard-coding one.

use serde::{Deserialize, Serialize};

use crate::ir::{ScalarFormat, ScalarKind};

/// Identifier casing applied to derived names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    Pascal,
    Camel,
    Snake,
    Preserve,
}

/// How one scalar kind renders in the target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarMapping {
    pub type_name: String,
    /// Literal used as the deterministic default for required fields, when
    /// the kind has a sensible empty value. `None` means "no default".
    pub empty_literal: Option<String>,
}

impl ScalarMapping {
    fn new(type_name: &str, empty_literal: Option<&str>) -> Self {
        Self {
            type_name: type_name.to_string(),
            empty_literal: empty_literal.map(str::to_string),
        }
    }
}

/// The scalar-kind x format mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarTable {
    pub string: ScalarMapping,
    pub date: ScalarMapping,
    pub date_time: ScalarMapping,
    pub uri: ScalarMapping,
    pub integer: ScalarMapping,
    pub number: ScalarMapping,
    pub boolean: ScalarMapping,
}

impl ScalarTable {
    pub fn lookup(&self, kind: ScalarKind, format: Option<ScalarFormat>) -> &ScalarMapping {
        match (kind, format) {
            (ScalarKind::String, Some(ScalarFormat::Date)) => &self.date,
            (ScalarKind::String, Some(ScalarFormat::DateTime)) => &self.date_time,
            (ScalarKind::String, Some(ScalarFormat::Uri)) => &self.uri,
            (ScalarKind::String, None) => &self.string,
            (ScalarKind::Integer, _) => &self.integer,
            (ScalarKind::Number, _) => &self.number,
            (ScalarKind::Boolean, _) => &self.boolean,
        }
    }
}

/// Target-language profile driving naming, mapping, and emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub scalars: ScalarTable,
    /// Ordered-sequence type template; `{item}` is replaced with the mapped
    /// element type.
    pub sequence_template: String,
    /// Default literal for required sequences.
    pub sequence_empty: String,
    /// Suffix marking a nullable type (`?` in C#).
    pub nullable_suffix: String,
    pub type_casing: Casing,
    pub property_casing: Casing,
    pub member_casing: Casing,
    /// Prefix token for identifiers that would otherwise start with a digit.
    pub numeric_prefix: String,
}

impl TargetProfile {
    /// The built-in C# profile.
    ///
    /// Honors the canonical scalar contract: string, DateOnly,
    /// DateTimeOffset, 32-bit int, fixed-point decimal, bool, `List<T>`.
    pub fn csharp() -> Self {
        Self {
            scalars: ScalarTable {
                string: ScalarMapping::new("string", Some("\"\"")),
                date: ScalarMapping::new("DateOnly", None),
                date_time: ScalarMapping::new("DateTimeOffset", None),
                uri: ScalarMapping::new("string", Some("\"\"")),
                integer: ScalarMapping::new("int", None),
                number: ScalarMapping::new("decimal", None),
                boolean: ScalarMapping::new("bool", None),
            },
            sequence_template: "List<{item}>".to_string(),
            sequence_empty: "new()".to_string(),
            nullable_suffix: "?".to_string(),
            type_casing: Casing::Pascal,
            property_casing: Casing::Pascal,
            member_casing: Casing::Pascal,
            numeric_prefix: "Value".to_string(),
        }
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::csharp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csharp_scalar_contract() {
        let p = TargetProfile::csharp();
        let table = &p.scalars;
        assert_eq!(table.lookup(ScalarKind::String, None).type_name, "string");
        assert_eq!(
            table
                .lookup(ScalarKind::String, Some(ScalarFormat::Date))
                .type_name,
            "DateOnly"
        );
        assert_eq!(
            table
                .lookup(ScalarKind::String, Some(ScalarFormat::DateTime))
                .type_name,
            "DateTimeOffset"
        );
        assert_eq!(table.lookup(ScalarKind::Integer, None).type_name, "int");
        assert_eq!(table.lookup(ScalarKind::Number, None).type_name, "decimal");
        assert_eq!(table.lookup(ScalarKind::Boolean, None).type_name, "bool");
    }

    #[test]
    fn profile_round_trips_through_json() {
        let p = TargetProfile::csharp();
        let json = serde_json::to_string(&p).unwrap();
        let back: TargetProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
