//! Composition handling: allOf flattening and oneOf/anyOf variants.
//!
//! allOf members are inlined into one synthetic object, so a reference on
//! this path must pull in the full target definition. That is exactly why a
//! cycle here cannot be broken with a back-reference and is fatal for the
//! definition instead.

use std::collections::BTreeMap;

use crate::document::{CompositionKind, RawComposition, RawDefinition, RawObject, SchemaDocument};
use crate::ir::{ObjectType, ResolvedType, ScalarFormat, ScalarKind, VariantBranch, VariantType};
use crate::resolve::{DefContext, ResolveError, Resolver};

/// Merge state for one allOf chain.
#[derive(Default)]
struct MergeAcc {
    /// Property name -> (schema, label of the member that contributed it).
    properties: BTreeMap<String, (RawDefinition, String)>,
    required: Vec<String>,
    description: Option<String>,
}

/// Flatten an allOf composition into one synthetic object type.
pub(crate) fn flatten_all_of(
    resolver: &Resolver<'_>,
    name_hint: &str,
    comp: &RawComposition,
    visiting: &mut Vec<String>,
    ctx: &mut DefContext,
) -> Result<ObjectType, ResolveError> {
    let mut acc = MergeAcc {
        description: comp.description.clone(),
        ..MergeAcc::default()
    };
    for (index, member) in comp.members.iter().enumerate() {
        let label = format!("member {}", index + 1);
        merge_node(resolver, member, &label, visiting, ctx, &mut acc)?;
    }

    let raw = RawObject {
        properties: acc
            .properties
            .into_iter()
            .map(|(name, (schema, _))| (name, schema))
            .collect(),
        required: acc.required,
        description: acc.description,
    };
    resolver.classify_object(name_hint, &raw, visiting, ctx)
}

/// Merge one allOf member into the accumulator, chasing references and
/// nested allOf chains.
fn merge_node(
    resolver: &Resolver<'_>,
    node: &RawDefinition,
    label: &str,
    visiting: &mut Vec<String>,
    ctx: &mut DefContext,
    acc: &mut MergeAcc,
) -> Result<(), ResolveError> {
    match node {
        RawDefinition::Reference(r) => {
            let Some(target) = resolver.doc().lookup(&r.target) else {
                return Err(ResolveError::DanglingReference {
                    origin: ctx.definition.clone(),
                    target: r.target.clone(),
                });
            };
            if let Some(position) = visiting.iter().position(|v| v == &r.target) {
                let mut chain: Vec<String> = visiting[position..].to_vec();
                chain.push(r.target.clone());
                return Err(ResolveError::CompositionCycle { chain });
            }
            visiting.push(r.target.clone());
            let merged = merge_node(resolver, target, &r.target, visiting, ctx, acc);
            visiting.pop();
            merged
        }
        RawDefinition::Composition(c) if c.kind == CompositionKind::AllOf => {
            for (index, member) in c.members.iter().enumerate() {
                let nested = format!("{label}, member {}", index + 1);
                merge_node(resolver, member, &nested, visiting, ctx, acc)?;
            }
            Ok(())
        }
        RawDefinition::Object(o) => merge_object(o, label, ctx, acc),
        _ => Err(ResolveError::UnsupportedShape {
            definition: ctx.definition.clone(),
            detail: format!("allOf {label} is not an object"),
        }),
    }
}

fn merge_object(
    o: &RawObject,
    label: &str,
    ctx: &mut DefContext,
    acc: &mut MergeAcc,
) -> Result<(), ResolveError> {
    if acc.description.is_none() {
        acc.description = o.description.clone();
    }
    for (prop, schema) in &o.properties {
        let Some((existing, first_label)) = acc.properties.get(prop) else {
            acc.properties
                .insert(prop.clone(), (schema.clone(), label.to_string()));
            continue;
        };
        if !existing.same_shape(schema) {
            return Err(ResolveError::IncompatibleMerge {
                definition: ctx.definition.clone(),
                property: prop.clone(),
                first: first_label.clone(),
                second: label.to_string(),
            });
        }
        // Same shape: the earlier description wins, later members only fill
        // a gap.
        if existing.description().is_none() && schema.description().is_some() {
            let first_label = first_label.clone();
            acc.properties
                .insert(prop.clone(), (schema.clone(), first_label));
        }
    }
    for entry in &o.required {
        if !acc.required.contains(entry) {
            acc.required.push(entry.clone());
        }
    }
    Ok(())
}

/// Build a variant type from a oneOf/anyOf composition.
pub(crate) fn build_variant(
    resolver: &Resolver<'_>,
    name_hint: &str,
    comp: &RawComposition,
    visiting: &mut Vec<String>,
    ctx: &mut DefContext,
) -> Result<VariantType, ResolveError> {
    let mut branches = Vec::with_capacity(comp.members.len());
    for (index, member) in comp.members.iter().enumerate() {
        let hint = format!("{name_hint}Choice{}", index + 1);
        let ty = resolver.classify(&hint, member, visiting, ctx)?;
        let label = branch_label(resolver, &ty, index);
        branches.push(VariantBranch { label, ty });
    }
    dedup_labels(&mut branches);

    let discriminator = comp
        .discriminator
        .clone()
        .or_else(|| infer_discriminator(resolver.doc(), &comp.members));

    Ok(VariantType {
        name: name_hint.to_string(),
        branches,
        discriminator,
        description: comp.description.clone(),
    })
}

fn branch_label(resolver: &Resolver<'_>, ty: &ResolvedType, index: usize) -> String {
    match ty {
        ResolvedType::Ref(target) => resolver.type_identifier(target),
        ResolvedType::Object(o) => o.name.clone(),
        ResolvedType::Enum(e) => e.name.clone(),
        ResolvedType::Variant(v) => v.name.clone(),
        ResolvedType::Scalar(s) => scalar_label(s.kind, s.format).to_string(),
        ResolvedType::Array(_) => format!("Choice{}", index + 1),
    }
}

fn scalar_label(kind: ScalarKind, format: Option<ScalarFormat>) -> &'static str {
    match (kind, format) {
        (ScalarKind::String, Some(ScalarFormat::Date)) => "Date",
        (ScalarKind::String, Some(ScalarFormat::DateTime)) => "DateTime",
        (ScalarKind::String, Some(ScalarFormat::Uri)) => "Uri",
        (ScalarKind::String, None) => "String",
        (ScalarKind::Integer, _) => "Integer",
        (ScalarKind::Number, _) => "Number",
        (ScalarKind::Boolean, _) => "Boolean",
    }
}

/// Branch labels double as wrapper property names, so they must be unique.
/// Duplicates get positional suffixes without a finding; nothing is renamed
/// away from a wire value here.
fn dedup_labels(branches: &mut [VariantBranch]) {
    let mut taken: Vec<String> = Vec::new();
    for branch in branches.iter_mut() {
        if !taken.iter().any(|t| t == &branch.label) {
            taken.push(branch.label.clone());
            continue;
        }
        let mut suffix = 2u32;
        loop {
            let candidate = format!("{}{suffix}", branch.label);
            if !taken.iter().any(|t| t == &candidate) {
                branch.label = candidate;
                break;
            }
            suffix += 1;
        }
        taken.push(branch.label.clone());
    }
}

/// Find the shared discriminator property of a branch set, if any: a
/// property that every object branch declares pinned to exactly one value
/// (a one-element enum). Zero or several candidates mean the variant stays
/// untagged.
fn infer_discriminator(doc: &SchemaDocument, members: &[RawDefinition]) -> Option<String> {
    let mut shared: Option<Vec<String>> = None;
    for member in members {
        let object = deref_object(doc, member)?;
        let pinned: Vec<String> = object
            .properties
            .iter()
            .filter(|(_, schema)| {
                matches!(schema, RawDefinition::Enum(e) if e.values.len() == 1)
            })
            .map(|(name, _)| name.clone())
            .collect();
        shared = Some(match shared {
            None => pinned,
            Some(existing) => existing.into_iter().filter(|p| pinned.contains(p)).collect(),
        });
    }
    let shared = shared?;
    match shared.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    }
}

/// Chase references down to an object definition, guarding against alias
/// chains that loop.
fn deref_object<'a>(doc: &'a SchemaDocument, node: &'a RawDefinition) -> Option<&'a RawObject> {
    let mut current = node;
    for _ in 0..16 {
        match current {
            RawDefinition::Object(o) => return Some(o),
            RawDefinition::Reference(r) => current = doc.lookup(&r.target)?,
            _ => return None,
        }
    }
    None
}
