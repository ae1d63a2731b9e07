//! Schema-driven type and wire-codec generation.
//!
//! `loam-typegen` turns a declarative set of named type definitions (with
//! cross-references, allOf/oneOf/anyOf compositions, and cycles) into
//! strongly-typed declarations for a target type system, plus lossless
//! string↔enum conversion helpers.
//!
//! # Architecture
//!
//! ```text
//! Loaders                Resolution                 Output
//! ─────────────      ─────────────────────      ──────────────
//! JSON Schema  ─┐    classify + flatten     ┌─> C# types
//! OpenAPI 3.x  ─┼──> (memoized per name) ───┤
//!               │    ResolvedType (ir.rs)   └─> enum codecs
//! SchemaDocument                │
//!                               └─> GenerationReport (findings)
//! ```
//!
//! Resolution is memoized per definition name inside one run context, so
//! shared sub-graphs are classified once and reference cycles terminate as
//! name-based back-references. Fatal conditions abandon only the affected
//! definition (and, for composition failures, its dependents); every
//! condition is reported as a [`Finding`](report::Finding) and the run
//! carries on.
//!
//! # Example
//!
//! ```
//! use loam_typegen::{generate, input::parse_schema_document, profile::TargetProfile};
//!
//! let doc = parse_schema_document(&serde_json::json!({
//!     "State": { "type": "string", "enum": ["NSW", "VIC"] },
//!     "Address": {
//!         "type": "object",
//!         "required": ["Suburb"],
//!         "properties": {
//!             "Suburb": { "type": "string" },
//!             "State": { "$ref": "#/definitions/State" }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let out = generate(&doc, &["Address", "State"], &TargetProfile::csharp());
//! assert!(out.report.is_empty());
//! assert!(out.text_for("Address").unwrap().contains("public class Address"));
//! assert!(out.text_for("State").unwrap().contains("FromWireValue"));
//! ```

pub mod document;
pub mod generate;
pub mod input;
pub mod ir;
pub mod mapper;
pub mod naming;
pub mod output;
pub mod profile;
pub mod report;
pub mod resolve;

mod compose;

// Re-export commonly used items
pub use document::{SchemaDocument, SchemaLoadError};
pub use generate::{
    Generated, GenerationOutput, generate, generate_all, generate_batch, resolve_definition,
};
pub use ir::{ResolvedType, UnknownEnumValue};
pub use profile::TargetProfile;
pub use report::{Finding, GenerationReport, Severity};
pub use resolve::ResolveError;
