//! C# renderer.
//!
//! One type declaration per resolved definition, plus a codec extensions
//! class per enum. Inline (anonymous) object, enum, and variant types found
//! inside a definition are rendered as sibling declarations in the same
//! block of text, under the names synthesized during classification.

use std::collections::VecDeque;

use crate::ir::{EnumType, ObjectType, ResolvedType, VariantType};
use crate::mapper::map_type;
use crate::naming;
use crate::profile::TargetProfile;

/// Render one resolved definition to C# text.
///
/// `name` is the definition's target identifier; it is only consulted for
/// alias-shaped definitions (scalars, arrays, and plain references), which
/// render as `global using` aliases.
pub fn render_definition(name: &str, ty: &ResolvedType, profile: &TargetProfile) -> String {
    let mut blocks: Vec<String> = Vec::new();
    match ty {
        ResolvedType::Object(_) | ResolvedType::Enum(_) | ResolvedType::Variant(_) => {
            let mut pending: VecDeque<&ResolvedType> = VecDeque::new();
            pending.push_back(ty);
            while let Some(current) = pending.pop_front() {
                match current {
                    ResolvedType::Object(o) => {
                        blocks.push(render_class(o, profile));
                        for field in &o.fields {
                            queue_inline(&field.ty, &mut pending);
                        }
                    }
                    ResolvedType::Enum(e) => {
                        blocks.push(render_enum(e));
                        blocks.push(render_codec(e));
                    }
                    ResolvedType::Variant(v) => {
                        blocks.push(render_variant(v, profile));
                        for branch in &v.branches {
                            queue_inline(&branch.ty, &mut pending);
                        }
                    }
                    _ => {}
                }
            }
        }
        ResolvedType::Scalar(_) | ResolvedType::Array(_) | ResolvedType::Ref(_) => {
            blocks.push(render_alias(name, ty, profile));
        }
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Queue inline types for sibling rendering. References stay references:
/// their targets are rendered by their own definition's run.
fn queue_inline<'a>(ty: &'a ResolvedType, pending: &mut VecDeque<&'a ResolvedType>) {
    match ty {
        ResolvedType::Object(_) | ResolvedType::Enum(_) | ResolvedType::Variant(_) => {
            pending.push_back(ty);
        }
        ResolvedType::Array(element) => queue_inline(element, pending),
        ResolvedType::Scalar(_) | ResolvedType::Ref(_) => {}
    }
}

fn render_class(o: &ObjectType, profile: &TargetProfile) -> String {
    let mut out = String::new();
    doc_comment(o.description.as_deref(), "", &mut out);
    out.push_str(&format!("public class {}\n{{\n", o.name));
    let mut first = true;
    for field in &o.fields {
        if !first {
            out.push('\n');
        }
        first = false;
        doc_comment(field.description.as_deref(), "    ", &mut out);
        let descriptor = map_type(&field.ty, field.required, profile);
        let nullable = if descriptor.is_nullable {
            profile.nullable_suffix.as_str()
        } else {
            ""
        };
        let property = property_name(&field.name, profile);
        match &descriptor.default_literal {
            Some(default) => out.push_str(&format!(
                "    public {}{nullable} {property} {{ get; set; }} = {default};\n",
                descriptor.type_name
            )),
            None => out.push_str(&format!(
                "    public {}{nullable} {property} {{ get; set; }}\n",
                descriptor.type_name
            )),
        }
    }
    out.push('}');
    out
}

fn render_enum(e: &EnumType) -> String {
    let mut out = String::new();
    doc_comment(e.description.as_deref(), "", &mut out);
    out.push_str(&format!("public enum {}\n{{\n", e.name));
    for member in &e.members {
        doc_comment(member.description.as_deref(), "    ", &mut out);
        out.push_str(&format!("    {},\n", member.canonical_name));
    }
    out.push('}');
    out
}

/// The codec pair. Decoding an unknown wire value throws deterministically,
/// so a producer that adds enum values before this consumer regenerates
/// fails loudly instead of guessing.
fn render_codec(e: &EnumType) -> String {
    let name = &e.name;
    let mut out = String::new();
    out.push_str(&format!("public static class {name}Extensions\n{{\n"));

    out.push_str(&format!(
        "    public static string ToWireValue(this {name} value) => value switch\n    {{\n"
    ));
    for member in &e.members {
        out.push_str(&format!(
            "        {name}.{} => \"{}\",\n",
            member.canonical_name,
            escape(&member.wire_value)
        ));
    }
    out.push_str(&format!(
        "        _ => throw new ArgumentOutOfRangeException(nameof(value), $\"unmapped {name} member: {{value}}\"),\n"
    ));
    out.push_str("    };\n\n");

    out.push_str(&format!(
        "    public static {name} FromWireValue(string value) => value switch\n    {{\n"
    ));
    for member in &e.members {
        out.push_str(&format!(
            "        \"{}\" => {name}.{},\n",
            escape(&member.wire_value),
            member.canonical_name
        ));
    }
    out.push_str(&format!(
        "        _ => throw new ArgumentException($\"unknown wire value '{{value}}' for {name}\"),\n"
    ));
    out.push_str("    };\n}");
    out
}

/// Variants render as a wrapper class: one nullable property per branch,
/// plus the discriminator as a plain string property when one exists. The
/// IR stays a closed tagged union either way; only the text is untagged.
fn render_variant(v: &VariantType, profile: &TargetProfile) -> String {
    let mut out = String::new();
    doc_comment(v.description.as_deref(), "", &mut out);
    out.push_str(&format!("public sealed class {}\n{{\n", v.name));
    let mut first = true;
    if let Some(discriminator) = &v.discriminator {
        let property = property_name(discriminator, profile);
        out.push_str(&format!(
            "    public string{} {property} {{ get; set; }}\n",
            profile.nullable_suffix
        ));
        first = false;
    }
    for branch in &v.branches {
        if !first {
            out.push('\n');
        }
        first = false;
        let descriptor = map_type(&branch.ty, false, profile);
        let property = property_name(&branch.label, profile);
        out.push_str(&format!(
            "    public {}{} {property} {{ get; set; }}\n",
            descriptor.type_name, profile.nullable_suffix
        ));
    }
    out.push('}');
    out
}

fn render_alias(name: &str, ty: &ResolvedType, profile: &TargetProfile) -> String {
    let target = map_type(ty, true, profile);
    format!("global using {name} = {};", target.type_name)
}

fn property_name(raw: &str, profile: &TargetProfile) -> String {
    naming::apply_casing(
        &naming::sanitize_identifier(raw, &profile.numeric_prefix),
        profile.property_casing,
    )
}

fn doc_comment(description: Option<&str>, indent: &str, out: &mut String) {
    let Some(description) = description else {
        return;
    };
    out.push_str(indent);
    out.push_str("/// <summary>\n");
    for line in description.lines() {
        out.push_str(indent);
        out.push_str("/// ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str("/// </summary>\n");
}

fn escape(wire: &str) -> String {
    wire.replace('\\', "\\\\").replace('"', "\\\"")
}
