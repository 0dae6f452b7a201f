//! Trailing cancellation-token rule
//!
//! Flags any method where a cancellation-token-typed parameter appears in a
//! position other than the last (non-variadic) parameter. Call sites reading
//! positional arguments keep token usage visually and semantically last.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Diagnostic, Rule, Severity};
use crate::symbols::{MethodSignature, TypeIdentity, TypeUniverse};

/// Default stable rule identifier
pub const DEFAULT_RULE_ID: &str = "CT1001";

/// Default fully-qualified name of the marker type
pub const DEFAULT_MARKER_TYPE: &str = "System.Threading.CancellationToken";

/// Default message template; `{0}` is replaced by the method display name
pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "Method '{0}' should take CancellationToken as the last parameter";

/// Rule title shown in listings
pub const TITLE: &str = "CancellationToken parameters should come last";

/// Which misplaced occurrence(s) to report for a violating method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Report the misplaced occurrence closest to the end, one diagnostic
    /// per method. This replicates the original backward-scan behavior and
    /// is the compatibility default.
    #[default]
    NearestEnd,
    /// Report the first misplaced occurrence in declaration order
    First,
    /// Report every misplaced occurrence
    All,
}

/// Configuration for the trailing-token rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPositionConfig {
    /// Stable rule identifier
    pub rule_id: String,
    /// Severity of emitted diagnostics
    pub severity: Severity,
    /// Fully-qualified name of the marker type to resolve
    pub marker_type_name: String,
    /// Whether the rule runs when no host override is given
    pub enabled_by_default: bool,
    /// Message template; `{0}` is replaced by the method display name
    pub message_template: String,
    /// Which misplaced occurrence(s) to report
    pub report_mode: ReportMode,
}

impl Default for TokenPositionConfig {
    fn default() -> Self {
        Self {
            rule_id: DEFAULT_RULE_ID.to_string(),
            severity: Severity::Warning,
            marker_type_name: DEFAULT_MARKER_TYPE.to_string(),
            enabled_by_default: true,
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            report_mode: ReportMode::NearestEnd,
        }
    }
}

impl TokenPositionConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule identifier
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }

    /// Set the diagnostic severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the marker type name
    pub fn with_marker_type(mut self, marker_type_name: impl Into<String>) -> Self {
        self.marker_type_name = marker_type_name.into();
        self
    }

    /// Set the report mode
    pub fn with_report_mode(mut self, report_mode: ReportMode) -> Self {
        self.report_mode = report_mode;
        self
    }
}

/// Rule flagging cancellation-token parameters that are not last.
///
/// A rule value exists only after marker resolution succeeded, so every
/// evaluation runs against an already-resolved immutable identity. The
/// evaluator is pure and holds no mutable state; one value may be shared
/// across concurrent evaluations.
pub struct TokenPositionRule {
    config: TokenPositionConfig,
    marker: TypeIdentity,
}

impl TokenPositionRule {
    /// Resolve the marker type and construct the rule for one analysis run.
    ///
    /// Returns `None` when the marker type is absent from the universe or
    /// the rule is disabled; the caller must not invoke the evaluator for
    /// that run. Neither case is an error to surface to the user.
    pub fn resolve(config: TokenPositionConfig, universe: &TypeUniverse) -> Option<Self> {
        if !config.enabled_by_default {
            debug!(rule_id = %config.rule_id, "rule disabled by configuration");
            return None;
        }
        match universe.resolve(&config.marker_type_name) {
            Some(marker) => Some(Self { config, marker }),
            None => {
                debug!(
                    marker_type = %config.marker_type_name,
                    "marker type not resolved; rule will not run"
                );
                None
            }
        }
    }

    /// Construct the rule from an already-resolved marker identity
    pub fn with_marker(config: TokenPositionConfig, marker: TypeIdentity) -> Self {
        Self { config, marker }
    }

    /// The resolved marker type identity
    pub fn marker(&self) -> &TypeIdentity {
        &self.marker
    }

    /// The active configuration
    pub fn config(&self) -> &TokenPositionConfig {
        &self.config
    }

    /// Evaluate one method signature, producing at most one diagnostic.
    ///
    /// Walks the parameter list backward from the last non-variadic slot
    /// and stops at the first marker-typed parameter that is not in that
    /// slot. Among multiple misplaced occurrences, the one closest to the
    /// end is the one reported.
    pub fn check(&self, signature: &MethodSignature) -> Option<Diagnostic> {
        let last = Self::adjusted_last(signature)?;
        for i in (0..=last).rev() {
            if signature.parameters[i].param_type == self.marker && i != last {
                return Some(self.diagnostic_for(signature));
            }
        }
        None
    }

    /// Index of the last parameter subject to the ordering requirement.
    ///
    /// A variadic final parameter is exempt and treated as absent for
    /// ordering purposes. A variadic flag anywhere else grants no exemption:
    /// such a signature is outside the language grammar and the parameter is
    /// scanned like any other.
    fn adjusted_last(signature: &MethodSignature) -> Option<usize> {
        if signature.parameters.is_empty() {
            return None;
        }
        let mut last = signature.parameters.len() - 1;
        if signature.parameters[last].is_variadic {
            if last == 0 {
                return None;
            }
            last -= 1;
        }
        Some(last)
    }

    fn diagnostic_for(&self, signature: &MethodSignature) -> Diagnostic {
        let message = self
            .config
            .message_template
            .replace("{0}", &signature.display_name);
        Diagnostic::new(
            self.config.rule_id.clone(),
            self.config.severity,
            message,
            signature.location.clone(),
        )
    }
}

impl Rule for TokenPositionRule {
    fn id(&self) -> &str {
        &self.config.rule_id
    }

    fn name(&self) -> &str {
        TITLE
    }

    fn description(&self) -> &str {
        "Methods accepting a cancellation token should take it as the last parameter"
    }

    fn default_severity(&self) -> Severity {
        self.config.severity
    }

    fn evaluate(&self, signature: &MethodSignature) -> Vec<Diagnostic> {
        match self.config.report_mode {
            ReportMode::NearestEnd => self.check(signature).into_iter().collect(),
            ReportMode::First => {
                let last = match Self::adjusted_last(signature) {
                    Some(last) => last,
                    None => return Vec::new(),
                };
                (0..last)
                    .find(|&i| signature.parameters[i].param_type == self.marker)
                    .map(|_| self.diagnostic_for(signature))
                    .into_iter()
                    .collect()
            }
            ReportMode::All => {
                let last = match Self::adjusted_last(signature) {
                    Some(last) => last,
                    None => return Vec::new(),
                };
                (0..last)
                    .filter(|&i| signature.parameters[i].param_type == self.marker)
                    .map(|_| self.diagnostic_for(signature))
                    .collect()
            }
        }
    }
}
