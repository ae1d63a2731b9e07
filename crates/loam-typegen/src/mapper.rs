//! Resolved types to target type descriptors.

use serde::{Deserialize, Serialize};

use crate::ir::ResolvedType;
use crate::naming;
use crate::profile::TargetProfile;

/// How one field or element renders in the target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub type_name: String,
    pub is_nullable: bool,
    /// Deterministic default for required fields; `None` means the target
    /// declares no initializer. Optional fields never get one: absence is
    /// "no value", which is not the type's zero value.
    pub default_literal: Option<String>,
}

/// Map a resolved type onto a target descriptor.
///
/// A required field is never nullable and, where the profile defines an
/// empty value for the type, gets it as a default. An optional field is
/// always nullable and never defaulted.
pub fn map_type(ty: &ResolvedType, required: bool, profile: &TargetProfile) -> TypeDescriptor {
    let (type_name, empty_literal) = match ty {
        ResolvedType::Scalar(s) => {
            let mapping = profile.scalars.lookup(s.kind, s.format);
            (mapping.type_name.clone(), mapping.empty_literal.clone())
        }
        ResolvedType::Array(element) => {
            let element = map_type(element, true, profile);
            (
                profile.sequence_template.replace("{item}", &element.type_name),
                Some(profile.sequence_empty.clone()),
            )
        }
        ResolvedType::Ref(target) => (
            naming::apply_casing(
                &naming::sanitize_identifier(target, &profile.numeric_prefix),
                profile.type_casing,
            ),
            None,
        ),
        ResolvedType::Object(o) => (o.name.clone(), None),
        ResolvedType::Enum(e) => (e.name.clone(), None),
        ResolvedType::Variant(v) => (v.name.clone(), None),
    };

    TypeDescriptor {
        type_name,
        is_nullable: !required,
        default_literal: if required { empty_literal } else { None },
    }
}
