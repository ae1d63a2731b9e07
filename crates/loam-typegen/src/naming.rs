//! Identifier derivation.
//!
//! Two distinct jobs live here: turning definition/property names into valid
//! target identifiers, and turning enum wire values into canonical member
//! names. Both are pure string functions so every run derives the same
//! identifiers from the same document.

use crate::profile::Casing;

/// Exact-value synonyms for wire values that sanitize poorly on their own.
/// Consulted before any splitting, so `"N/A"` never becomes `Na`.
const SYNONYMS: &[(&str, &str)] = &[
    ("N/A", "NotApplicable"),
    ("n/a", "NotApplicable"),
    ("&", "And"),
    ("+", "Plus"),
    ("%", "Percent"),
    ("#", "Number"),
];

/// Strip characters that cannot appear in a target identifier and re-prefix
/// a leading digit. Preserves the original casing.
pub fn sanitize_identifier(raw: &str, digit_prefix: &str) -> String {
    let mut out: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if out.is_empty() {
        out = digit_prefix.to_string();
    } else if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out = format!("{digit_prefix}{out}");
    }
    out
}

/// Split an identifier into words on separators and lower-to-upper case
/// boundaries: `UnitNumber` -> `["Unit", "Number"]`, `unit_number` likewise.
fn words(ident: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in ident.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
    }
}

/// Re-case an already sanitized identifier.
pub fn apply_casing(ident: &str, casing: Casing) -> String {
    match casing {
        Casing::Preserve => ident.to_string(),
        Casing::Pascal => words(ident).iter().map(|w| title_case(w)).collect(),
        Casing::Camel => {
            let mut out = String::new();
            for (i, w) in words(ident).iter().enumerate() {
                if i == 0 {
                    out.push_str(&w.to_ascii_lowercase());
                } else {
                    out.push_str(&title_case(w));
                }
            }
            out
        }
        Casing::Snake => words(ident)
            .iter()
            .map(|w| w.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// Canonical member name for one wire value, before collision handling.
///
/// Pipeline: trim, exact synonym lookup, split on whitespace/hyphen/slash,
/// title-case each segment, concatenate. Numeric-leading results get the
/// configured prefix token; values that sanitize to nothing fall back to the
/// prefix token alone.
pub fn canonical_member_name(wire: &str, digit_prefix: &str) -> String {
    let trimmed = wire.trim();
    if let Some((_, synonym)) = SYNONYMS.iter().find(|(w, _)| *w == trimmed) {
        return (*synonym).to_string();
    }

    let mut out = String::new();
    for segment in trimmed.split(|c: char| c.is_whitespace() || c == '-' || c == '/') {
        let cleaned: String = segment
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        out.push_str(&title_case(&cleaned));
    }

    if out.is_empty() {
        out = digit_prefix.to_string();
    } else if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out = format!("{digit_prefix}{out}");
    }
    out
}

/// Outcome of naming one enum member.
pub struct MemberName {
    pub canonical: String,
    /// Set when a collision forced a numeric suffix.
    pub renamed_from: Option<String>,
}

/// Assign canonical names to a whole member list.
///
/// Collisions (distinct wire values normalizing identically) are resolved in
/// first-seen order: the first occurrence keeps the bare name, later ones get
/// `2`, `3`, ... suffixes. First-seen order is declaration order, i.e. the
/// order values appear in the schema's enum array.
pub fn assign_member_names(wires: &[String], digit_prefix: &str) -> Vec<MemberName> {
    let mut taken: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(wires.len());
    for wire in wires {
        let base = canonical_member_name(wire, digit_prefix);
        if !taken.iter().any(|t| t == &base) {
            taken.push(base.clone());
            out.push(MemberName {
                canonical: base,
                renamed_from: None,
            });
            continue;
        }
        let mut suffix = 2u32;
        let chosen = loop {
            let candidate = format!("{base}{suffix}");
            if !taken.iter().any(|t| t == &candidate) {
                break candidate;
            }
            suffix += 1;
        };
        taken.push(chosen.clone());
        out.push(MemberName {
            canonical: chosen,
            renamed_from: Some(base),
        });
    }
    out
}
