//! Run diagnostics.
//!
//! Every recoverable condition during generation becomes a [`Finding`];
//! the ordered [`GenerationReport`] always accompanies whatever text was
//! produced, even on partial failure.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One diagnostic entry, attached to the definition it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub definition: String,
    pub message: String,
}

impl Finding {
    pub fn warning(definition: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            definition: definition.into(),
            message: message.into(),
        }
    }

    pub fn error(definition: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            definition: definition.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}[{}]: {}", self.definition, self.message)
    }
}

/// Ordered findings for one run. Accumulated during generation, returned
/// once, never mutated afterwards by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    findings: Vec<Finding>,
}

impl GenerationReport {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    /// Findings attached to one definition.
    pub fn for_definition<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.definition == name)
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}
