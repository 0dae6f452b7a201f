//! Rule framework for cancellation analysis
//!
//! This module provides the core abstractions for defining and executing
//! analysis rules against resolved method signatures.

pub mod token_position;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::symbols::{MethodSignature, SourceLocation};

/// Severity level for emitted diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Editor-surfaced hint, hidden in most reports
    Hint,
    /// Informational - no action required
    Info,
    /// Warning - should be addressed but not blocking
    Warning,
    /// Error - must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Warning
    }
}

/// A single analysis finding anchored to a method declaration.
///
/// Diagnostics are immutable once created; ownership transfers to the
/// diagnostic sink as soon as the rule produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable identifier of the rule that produced this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Declaration location the diagnostic is anchored to
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
        }
    }

    /// Check if this is a blocking diagnostic
    pub fn is_blocking(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.severity, self.rule_id, self.location, self.message
        )
    }
}

/// Trait for implementing analysis rules
///
/// Rules are deterministic, pure analysis logic that produce diagnostics
/// without mutating their input. Each rule holds whatever run-scoped state
/// it resolved during setup (e.g. a marker type identity) and evaluates one
/// method signature at a time; evaluation is safe to invoke concurrently.
pub trait Rule: Send + Sync {
    /// Stable identifier for this rule
    fn id(&self) -> &str;

    /// Human-readable name for this rule
    fn name(&self) -> &str;

    /// Description of what this rule checks
    fn description(&self) -> &str;

    /// Default severity for diagnostics from this rule
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Evaluate the rule against a single method signature.
    ///
    /// Returns the diagnostics for this method (empty when the method is
    /// clean). The evaluator never fails on a well-formed signature.
    fn evaluate(&self, signature: &MethodSignature) -> Vec<Diagnostic>;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn Rule>;

/// Consumer of emitted diagnostics.
///
/// The engine forwards each diagnostic to the sink as soon as a rule
/// produces it; the sink owns the record from that point on.
pub trait DiagnosticSink {
    /// Accept one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// In-memory collecting sink
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected diagnostics, in emission order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the buffer, yielding the collected diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Number of collected diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// True when nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for DiagnosticBuffer {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
