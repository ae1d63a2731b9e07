//! Reference resolution and classification.
//!
//! A [`Resolver`] is the run context: it owns the memoized resolution index
//! for one document + profile pair and is discarded with the run, so a stale
//! document can never leak into the next run. Resolution of distinct
//! definitions may run on worker threads; the index is shared behind one
//! lock.
//!
//! Cycle handling in one place: a reference to a definition that is still on
//! the in-progress stack resolves to a [`ResolvedType::Ref`] back-reference,
//! so object-to-object cycles terminate without duplication. The allOf
//! flattener (see [`crate::compose`]) must inline full definitions instead,
//! which is why a cycle found on that path is fatal for the definition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::compose;
use crate::document::{CompositionKind, RawDefinition, RawEnum, RawObject, RawReference, SchemaDocument};
use crate::ir::{EnumMember, EnumType, FieldDef, ObjectType, ResolvedType, ScalarType};
use crate::naming;
use crate::profile::{Casing, TargetProfile};
use crate::report::Finding;

/// Why a definition could not be resolved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("definition `{0}` not found")]
    NotFound(String),

    #[error("unresolved reference `{target}` in `{origin}`")]
    DanglingReference { origin: String, target: String },

    #[error("unsupported schema shape in `{definition}`: {detail}")]
    UnsupportedShape { definition: String, detail: String },

    #[error("allOf cycle through `{}`", .chain.join(" -> "))]
    CompositionCycle { chain: Vec<String> },

    #[error(
        "cannot merge property `{property}` in `{definition}`: {first} and {second} declare incompatible types"
    )]
    IncompatibleMerge {
        definition: String,
        property: String,
        first: String,
        second: String,
    },
}

impl ResolveError {
    /// Whether a failure in a referenced definition also fails the
    /// definitions that point at it. Dangling references and unsupported
    /// shapes abandon only the definition they occur in; merge failures and
    /// composition cycles poison everything built on top of them.
    pub(crate) fn poisons_dependents(&self) -> bool {
        matches!(
            self,
            ResolveError::CompositionCycle { .. } | ResolveError::IncompatibleMerge { .. }
        )
    }
}

/// Outcome of resolving one named definition, memoized for the run.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub result: Result<ResolvedType, ResolveError>,
    pub findings: Vec<Finding>,
}

/// Findings sink for the definition currently being resolved.
pub(crate) struct DefContext {
    pub definition: String,
    pub findings: Vec<Finding>,
}

/// Per-run resolution context.
pub(crate) struct Resolver<'a> {
    doc: &'a SchemaDocument,
    profile: &'a TargetProfile,
    cache: Mutex<HashMap<String, Arc<Resolution>>>,
}

impl<'a> Resolver<'a> {
    pub fn new(doc: &'a SchemaDocument, profile: &'a TargetProfile) -> Self {
        Self {
            doc,
            profile,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn doc(&self) -> &SchemaDocument {
        self.doc
    }

    /// Resolve a named definition, reusing the memoized outcome if present.
    pub fn resolve(&self, name: &str) -> Arc<Resolution> {
        let mut visiting = Vec::new();
        self.resolve_named(name, &mut visiting)
    }

    /// Everything resolved so far, in deterministic name order.
    pub fn resolutions(&self) -> Vec<(String, Arc<Resolution>)> {
        let cache = self.cache.lock().unwrap();
        let mut entries: Vec<_> = cache
            .iter()
            .map(|(name, res)| (name.clone(), res.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Final target identifier for a definition name.
    pub fn type_identifier(&self, raw: &str) -> String {
        naming::apply_casing(
            &naming::sanitize_identifier(raw, &self.profile.numeric_prefix),
            self.profile.type_casing,
        )
    }

    pub(crate) fn resolve_named(
        &self,
        name: &str,
        visiting: &mut Vec<String>,
    ) -> Arc<Resolution> {
        if let Some(hit) = self.cache.lock().unwrap().get(name) {
            return hit.clone();
        }
        tracing::debug!(definition = name, "resolving");

        let mut ctx = DefContext {
            definition: name.to_string(),
            findings: Vec::new(),
        };
        let result = match self.doc.lookup(name) {
            None => Err(ResolveError::NotFound(name.to_string())),
            Some(raw) => {
                visiting.push(name.to_string());
                let resolved = self.classify(&self.type_identifier(name), raw, visiting, &mut ctx);
                visiting.pop();
                resolved
            }
        };
        if let Err(err) = &result {
            tracing::warn!(definition = name, error = %err, "definition abandoned");
            ctx.findings.push(Finding::error(name, err.to_string()));
        }

        let resolution = Arc::new(Resolution {
            result,
            findings: ctx.findings,
        });
        // Two workers may race to resolve the same name; classification is
        // deterministic, so keeping the first insert is safe either way.
        self.cache
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert(resolution)
            .clone()
    }

    /// Classify one raw node. `name_hint` is the final identifier the node
    /// gets if it turns out to be a named (or synthesized) type.
    pub(crate) fn classify(
        &self,
        name_hint: &str,
        node: &RawDefinition,
        visiting: &mut Vec<String>,
        ctx: &mut DefContext,
    ) -> Result<ResolvedType, ResolveError> {
        match node {
            RawDefinition::Reference(r) => self.classify_reference(r, visiting, ctx),
            RawDefinition::Enum(e) => self.classify_enum(name_hint, e, ctx),
            RawDefinition::Composition(c) => match c.kind {
                CompositionKind::AllOf => {
                    compose::flatten_all_of(self, name_hint, c, visiting, ctx)
                        .map(ResolvedType::Object)
                }
                CompositionKind::OneOf | CompositionKind::AnyOf => {
                    compose::build_variant(self, name_hint, c, visiting, ctx)
                        .map(ResolvedType::Variant)
                }
            },
            RawDefinition::Object(o) => self
                .classify_object(name_hint, o, visiting, ctx)
                .map(ResolvedType::Object),
            RawDefinition::Array(a) => {
                let element =
                    self.classify(&format!("{name_hint}Item"), &a.items, visiting, ctx)?;
                Ok(ResolvedType::Array(Box::new(element)))
            }
            RawDefinition::Scalar(s) => Ok(ResolvedType::Scalar(ScalarType {
                kind: s.kind,
                format: s.format,
                pattern: s.pattern.clone(),
                max_length: s.max_length,
            })),
            RawDefinition::Other(o) => Err(ResolveError::UnsupportedShape {
                definition: ctx.definition.clone(),
                detail: o.detail.clone(),
            }),
        }
    }

    fn classify_reference(
        &self,
        r: &RawReference,
        visiting: &mut Vec<String>,
        ctx: &mut DefContext,
    ) -> Result<ResolvedType, ResolveError> {
        if !self.doc.contains(&r.target) {
            return Err(ResolveError::DanglingReference {
                origin: ctx.definition.clone(),
                target: r.target.clone(),
            });
        }
        if visiting.iter().any(|v| v == &r.target) {
            // Back-reference into a definition currently on the stack; the
            // memo index ties the knot once that definition completes.
            return Ok(ResolvedType::Ref(r.target.clone()));
        }
        let dep = self.resolve_named(&r.target, visiting);
        match &dep.result {
            Err(err) if err.poisons_dependents() => Err(err.clone()),
            _ => Ok(ResolvedType::Ref(r.target.clone())),
        }
    }

    fn classify_enum(
        &self,
        name_hint: &str,
        e: &RawEnum,
        ctx: &mut DefContext,
    ) -> Result<ResolvedType, ResolveError> {
        let mut wires = Vec::with_capacity(e.values.len());
        for value in &e.values {
            match value.as_str() {
                Some(s) => wires.push(s.to_string()),
                None => {
                    return Err(ResolveError::UnsupportedShape {
                        definition: ctx.definition.clone(),
                        detail: format!("non-string enum value `{value}`"),
                    });
                }
            }
        }

        let assigned = naming::assign_member_names(&wires, &self.profile.numeric_prefix);
        let mut members = Vec::with_capacity(wires.len());
        for (wire, assignment) in wires.iter().zip(assigned) {
            if let Some(base) = &assignment.renamed_from {
                ctx.findings.push(Finding::warning(
                    &ctx.definition,
                    format!(
                        "enum value `{wire}` in `{name_hint}` normalizes to `{base}`, \
                         already taken; renamed to `{}`",
                        assignment.canonical
                    ),
                ));
            }
            members.push(EnumMember {
                wire_value: wire.clone(),
                canonical_name: naming::apply_casing(
                    &assignment.canonical,
                    self.profile.member_casing,
                ),
                description: None,
            });
        }

        Ok(ResolvedType::Enum(EnumType {
            name: name_hint.to_string(),
            members,
            description: e.description.clone(),
        }))
    }

    pub(crate) fn classify_object(
        &self,
        name_hint: &str,
        o: &RawObject,
        visiting: &mut Vec<String>,
        ctx: &mut DefContext,
    ) -> Result<ObjectType, ResolveError> {
        let mut required: Vec<&str> = Vec::new();
        for entry in &o.required {
            if o.properties.contains_key(entry) {
                if !required.contains(&entry.as_str()) {
                    required.push(entry);
                }
            } else {
                ctx.findings.push(Finding::error(
                    &ctx.definition,
                    format!(
                        "required entry `{entry}` in `{name_hint}` does not match any \
                         declared property; ignored"
                    ),
                ));
            }
        }
        let required: Vec<String> = required.into_iter().map(String::from).collect();

        let mut fields = Vec::with_capacity(o.properties.len());
        for (prop, schema) in &o.properties {
            let segment = naming::apply_casing(
                &naming::sanitize_identifier(prop, &self.profile.numeric_prefix),
                Casing::Pascal,
            );
            let ty = self.classify(&format!("{name_hint}{segment}"), schema, visiting, ctx)?;
            fields.push(FieldDef {
                name: prop.clone(),
                ty,
                required: required.iter().any(|r| r == prop),
                description: schema.description().map(String::from),
            });
        }

        Ok(ObjectType {
            name: name_hint.to_string(),
            fields,
            description: o.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_schema_document;
    use serde_json::json;

    #[test]
    fn object_cycle_terminates_with_back_references() {
        let doc = parse_schema_document(&json!({
            "Person": {
                "type": "object",
                "properties": {
                    "BestFriend": { "$ref": "#/definitions/Pet" }
                }
            },
            "Pet": {
                "type": "object",
                "properties": {
                    "Owner": { "$ref": "#/definitions/Person" }
                }
            }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        let person = resolver.resolve("Person");
        let pet = resolver.resolve("Pet");
        let ResolvedType::Object(person) = person.result.as_ref().unwrap() else {
            panic!("expected object");
        };
        let ResolvedType::Object(pet) = pet.result.as_ref().unwrap() else {
            panic!("expected object");
        };
        assert_eq!(person.fields[0].ty, ResolvedType::Ref("Pet".into()));
        assert_eq!(pet.fields[0].ty, ResolvedType::Ref("Person".into()));
    }

    #[test]
    fn dangling_reference_abandons_only_the_source() {
        let doc = parse_schema_document(&json!({
            "Broken": {
                "type": "object",
                "properties": { "Target": { "$ref": "#/definitions/Missing" } }
            },
            "Fine": { "type": "string" }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        let broken = resolver.resolve("Broken");
        assert_eq!(
            broken.result,
            Err(ResolveError::DanglingReference {
                origin: "Broken".into(),
                target: "Missing".into(),
            })
        );
        assert!(resolver.resolve("Fine").result.is_ok());
    }

    #[test]
    fn referencing_a_dangling_definition_still_generates() {
        let doc = parse_schema_document(&json!({
            "Broken": {
                "type": "object",
                "properties": { "Target": { "$ref": "#/definitions/Missing" } }
            },
            "Wrapper": {
                "type": "object",
                "properties": { "Inner": { "$ref": "#/definitions/Broken" } }
            }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        // Broken is abandoned, but Wrapper only points at it by name.
        assert!(resolver.resolve("Wrapper").result.is_ok());
    }

    #[test]
    fn dangling_required_entry_is_excluded_with_error_finding() {
        let doc = parse_schema_document(&json!({
            "Listing": {
                "type": "object",
                "required": ["Suburb", "Ghost"],
                "properties": { "Suburb": { "type": "string" } }
            }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        let listing = resolver.resolve("Listing");
        let ResolvedType::Object(obj) = listing.result.as_ref().unwrap() else {
            panic!("expected object");
        };
        assert!(obj.fields.iter().all(|f| f.name != "Ghost"));
        assert!(obj.fields.iter().any(|f| f.name == "Suburb" && f.required));
        assert_eq!(listing.findings.len(), 1);
        assert!(listing.findings[0].message.contains("Ghost"));
    }

    #[test]
    fn unsupported_shape_is_rejected_per_definition() {
        let doc = parse_schema_document(&json!({
            "Weird": { "not": { "type": "string" } },
            "Fine": { "type": "boolean" }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        assert!(matches!(
            resolver.resolve("Weird").result,
            Err(ResolveError::UnsupportedShape { .. })
        ));
        assert!(resolver.resolve("Fine").result.is_ok());
    }

    #[test]
    fn enum_collision_warns_and_keeps_wire_values() {
        let doc = parse_schema_document(&json!({
            "Mode": { "type": "string", "enum": ["no-op", "noop", "NOOP"] }
        }))
        .unwrap();
        let profile = TargetProfile::csharp();
        let resolver = Resolver::new(&doc, &profile);

        let mode = resolver.resolve("Mode");
        let ResolvedType::Enum(e) = mode.result.as_ref().unwrap() else {
            panic!("expected enum");
        };
        let names: Vec<_> = e.members.iter().map(|m| m.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["NoOp", "Noop", "Noop2"]);
        let wires: Vec<_> = e.members.iter().map(|m| m.wire_value.as_str()).collect();
        assert_eq!(wires, vec!["no-op", "noop", "NOOP"]);
        assert_eq!(mode.findings.len(), 1);
    }
}
