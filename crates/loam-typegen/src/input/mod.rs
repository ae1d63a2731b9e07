//! Document loaders.
//!
//! Each loader walks an already-parsed `serde_json::Value` and builds a
//! [`SchemaDocument`](crate::document::SchemaDocument). Reading and parsing
//! the raw text is the caller's job.

mod jsonschema;
mod openapi;

pub use jsonschema::parse_schema_document;
pub use openapi::parse_openapi_document;
