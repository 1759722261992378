//! Diagnostics emitted while normalizing an artifact
//!
//! The normalizer never prints. Every decision worth auditing (how a function
//! was classified, which tokens were ignored, which fields were backfilled) is
//! handed to a [`DiagnosticSink`] supplied by the caller.

use std::fmt;

use serde::Serialize;

/// Receiver for normalization diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// A single normalization diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Function the diagnostic concerns, if any
    pub function: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn info(kind: DiagnosticKind, function: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            function: function.map(str::to_string),
            message,
        }
    }

    pub fn warning(kind: DiagnosticKind, function: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            function: function.map(str::to_string),
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        if let Some(ref function) = self.function {
            write!(f, "{} [{}] in {}: {}", prefix, self.kind, function, self.message)
        } else {
            write!(f, "{} [{}]: {}", prefix, self.kind, self.message)
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Category of normalization event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Classification,
    UnrecognizedAttribute,
    AttributeDropped,
    ReturnTypesCleared,
    FunctionExcluded,
    Migration,
    Backfill,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::Classification => write!(f, "classification"),
            DiagnosticKind::UnrecognizedAttribute => write!(f, "unrecognized-attribute"),
            DiagnosticKind::AttributeDropped => write!(f, "attribute-dropped"),
            DiagnosticKind::ReturnTypesCleared => write!(f, "return-types-cleared"),
            DiagnosticKind::FunctionExcluded => write!(f, "function-excluded"),
            DiagnosticKind::Migration => write!(f, "migration"),
            DiagnosticKind::Backfill => write!(f, "backfill"),
        }
    }
}

/// In-memory collector; the sink used by tests and the CLI's `--json` output
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    pub fn infos(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .collect()
    }

    /// All diagnostics of one kind, in emission order
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` (info → DEBUG, warning → WARN)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let function = diagnostic.function.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Info => tracing::debug!(
                kind = %diagnostic.kind,
                function,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                kind = %diagnostic.kind,
                function,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}
