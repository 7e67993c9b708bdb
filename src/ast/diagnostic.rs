use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic emitted while rendering.
///
/// `Error` means content was lost (a node could not be rendered at all);
/// `Warning` means a node rendered a marker or nothing for data reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// The phase that produced the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPhase {
    Dispatch,
    Resolve,
}

/// A structured, node-scoped diagnostic.
///
/// Diagnostics never abort a render; the offending node renders a marker (or
/// nothing) and its siblings render normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<DiagnosticPhase>,

    /// A stable identifier like `reference.not_found`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human readable message. For inline markers this is the marker text.
    pub message: String,

    /// The embed `nodeId` this diagnostic refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Diagnostic {
    pub fn warning(phase: DiagnosticPhase, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            phase: Some(phase),
            code: Some(code.to_string()),
            message: message.into(),
            node_id: None,
        }
    }

    pub fn error(phase: DiagnosticPhase, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(phase, code, message)
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}")?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}
