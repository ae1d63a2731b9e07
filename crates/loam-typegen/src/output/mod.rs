//! Output rendering.
//!
//! Emission is a pure function of resolved types and the target profile: it
//! performs no schema traversal and raises no resolution errors. Anything
//! inconsistent must already have been caught upstream.

pub mod csharp;

pub use csharp::render_definition;
