//! Public generation entry points.
//!
//! No error escapes these functions: every per-definition condition becomes
//! a report finding, and only document loading (upstream of generation) can
//! fail the whole run. Definitions in one batch are independent once the
//! read-only document is built, so the batch variant fans resolution out
//! over rayon workers sharing the run's memo index; the report stays in
//! deterministic order regardless of scheduling.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::document::SchemaDocument;
use crate::ir::ResolvedType;
use crate::output::render_definition;
use crate::profile::TargetProfile;
use crate::report::GenerationReport;
use crate::resolve::Resolver;

/// Rendered output for one successfully generated definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Definition name as requested.
    pub name: String,
    /// Rendered type text (and codec functions, for enums).
    pub text: String,
}

/// Everything one run produces. The report accompanies whatever text was
/// produced, even on partial failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutput {
    pub generated: Vec<Generated>,
    pub report: GenerationReport,
}

impl GenerationOutput {
    /// Rendered text for one requested definition, if it succeeded.
    pub fn text_for(&self, name: &str) -> Option<&str> {
        self.generated
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.text.as_str())
    }
}

/// Generate the requested definitions serially.
pub fn generate(
    doc: &SchemaDocument,
    requests: &[&str],
    profile: &TargetProfile,
) -> GenerationOutput {
    run(doc, requests, profile, false)
}

/// Generate the requested definitions, resolving across rayon workers.
///
/// Output and report are identical to [`generate`]; only wall-clock time
/// differs.
pub fn generate_batch(
    doc: &SchemaDocument,
    requests: &[&str],
    profile: &TargetProfile,
) -> GenerationOutput {
    run(doc, requests, profile, true)
}

/// Generate every definition in the document.
pub fn generate_all(doc: &SchemaDocument, profile: &TargetProfile) -> GenerationOutput {
    let names: Vec<&str> = doc.names().collect();
    run(doc, &names, profile, true)
}

/// Resolve one definition to its IR without rendering.
///
/// Returns `None` with an explanatory report when the definition is
/// abandoned.
pub fn resolve_definition(
    doc: &SchemaDocument,
    name: &str,
    profile: &TargetProfile,
) -> (Option<ResolvedType>, GenerationReport) {
    let resolver = Resolver::new(doc, profile);
    let resolution = resolver.resolve(name);
    let mut report = GenerationReport::default();
    report.extend(resolution.findings.iter().cloned());
    (resolution.result.as_ref().ok().cloned(), report)
}

fn run(
    doc: &SchemaDocument,
    requests: &[&str],
    profile: &TargetProfile,
    parallel: bool,
) -> GenerationOutput {
    let resolver = Resolver::new(doc, profile);
    tracing::debug!(requested = requests.len(), parallel, "generation run");

    if parallel {
        requests.par_iter().for_each(|name| {
            resolver.resolve(name);
        });
    }

    let mut generated = Vec::new();
    let mut report = GenerationReport::default();
    let mut reported: BTreeSet<String> = BTreeSet::new();

    for name in requests {
        let resolution = resolver.resolve(name);
        if reported.insert((*name).to_string()) {
            report.extend(resolution.findings.iter().cloned());
        } else {
            continue;
        }
        if let Ok(ty) = &resolution.result {
            let identifier = resolver.type_identifier(name);
            generated.push(Generated {
                name: (*name).to_string(),
                text: render_definition(&identifier, ty, profile),
            });
        }
    }

    // Findings recorded while resolving dependencies of the requested set,
    // in name order so repeated runs report identically.
    for (name, resolution) in resolver.resolutions() {
        if !reported.contains(&name) {
            report.extend(resolution.findings.iter().cloned());
        }
    }

    tracing::debug!(
        generated = generated.len(),
        findings = report.len(),
        "generation run finished"
    );
    GenerationOutput { generated, report }
}
