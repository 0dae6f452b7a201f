//! Analysis engine for the cancellation rule set
//!
//! This module provides the run-scoped orchestration around the rules:
//! marker resolution gating, per-method evaluation, and aggregation of
//! emitted diagnostics into an analysis result.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::symbols::{SymbolProvider, TypeUniverse};
use rules::token_position::{TokenPositionConfig, TokenPositionRule};
use rules::{BoxedRule, Diagnostic, DiagnosticBuffer, DiagnosticSink, Rule, Severity};

/// Result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the run produced no blocking diagnostics
    pub is_clean: bool,
    /// All diagnostics emitted during the run, in emission order
    pub diagnostics: Vec<Diagnostic>,
    /// Compilation unit name, if the provider supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Number of method declarations evaluated
    pub methods_analyzed: usize,
    /// Number of methods with at least one diagnostic
    pub methods_flagged: usize,
    /// Number of rules active for this run (after resolution gating)
    pub rules_active: usize,
    /// Run duration in milliseconds
    pub duration_ms: u64,
}

impl AnalysisResult {
    /// Count diagnostics at the given severity
    pub fn count_at(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True when the run produced no diagnostics at all
    pub fn is_silent(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The core analysis engine.
///
/// Holds the rules that survived run-scoped setup. Evaluation is
/// deterministic and side-effect-free; the same provider always yields the
/// same result.
pub struct AnalysisEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl AnalysisEngine {
    /// Create an engine with the default rule set.
    ///
    /// Rules whose run-scoped setup fails (e.g. the marker type is absent
    /// from the universe) are silently not registered; the run then analyzes
    /// methods against whatever rules remain, possibly none.
    pub fn new(universe: &TypeUniverse) -> Self {
        Self::with_config(universe, TokenPositionConfig::default())
    }

    /// Create an engine with a custom trailing-token configuration
    pub fn with_config(universe: &TypeUniverse, config: TokenPositionConfig) -> Self {
        let mut engine = Self::empty();
        if let Some(rule) = TokenPositionRule::resolve(config, universe) {
            engine.register(Arc::new(rule));
        }
        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register an analysis rule
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Register a boxed rule
    pub fn register_boxed(&mut self, rule: BoxedRule) {
        self.rules.push(Arc::from(rule));
    }

    /// All registered rules
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Analyze every method the provider exposes, collecting diagnostics.
    pub fn analyze(&self, provider: &dyn SymbolProvider) -> AnalysisResult {
        let start = Instant::now();
        let mut buffer = DiagnosticBuffer::new();
        let mut methods_flagged = 0usize;

        let methods = provider.methods();
        for method in methods {
            let before = buffer.len();
            self.evaluate_method(method, &mut buffer);
            if buffer.len() > before {
                methods_flagged += 1;
            }
        }

        let diagnostics = buffer.into_diagnostics();
        debug!(
            methods = methods.len(),
            flagged = methods_flagged,
            diagnostics = diagnostics.len(),
            "analysis run complete"
        );

        AnalysisResult {
            is_clean: !diagnostics.iter().any(Diagnostic::is_blocking),
            diagnostics,
            unit: provider.unit_name().map(str::to_string),
            methods_analyzed: methods.len(),
            methods_flagged,
            rules_active: self.rules.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Analyze every method, forwarding each diagnostic to the sink as it
    /// is produced. Returns the number of diagnostics reported.
    pub fn analyze_with_sink(
        &self,
        provider: &dyn SymbolProvider,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let mut reported = 0usize;
        for method in provider.methods() {
            for rule in &self.rules {
                for diagnostic in rule.evaluate(method) {
                    sink.report(diagnostic);
                    reported += 1;
                }
            }
        }
        reported
    }

    fn evaluate_method(
        &self,
        method: &crate::symbols::MethodSignature,
        sink: &mut dyn DiagnosticSink,
    ) {
        for rule in &self.rules {
            for diagnostic in rule.evaluate(method) {
                sink.report(diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{MethodSignature, ParameterDescriptor, SourceLocation, SymbolModel};

    const TOKEN: &str = "System.Threading.CancellationToken";

    fn violating_model() -> SymbolModel {
        SymbolModel::new().with_unit("App").with_method(
            MethodSignature::new("App.Service.Run", SourceLocation::new("svc.cs", 3, 17))
                .with_parameter(ParameterDescriptor::of_type(TOKEN).with_name("ct"))
                .with_parameter(ParameterDescriptor::of_type("System.Int32").with_name("retries")),
        )
    }

    #[test]
    fn test_empty_engine() {
        let engine = AnalysisEngine::empty();
        assert!(engine.rules().is_empty());
    }

    #[test]
    fn test_default_engine_registers_the_rule_when_marker_resolves() {
        let mut universe = TypeUniverse::new();
        universe.register(TOKEN);
        let engine = AnalysisEngine::new(&universe);
        assert_eq!(engine.rules().len(), 1);
    }

    #[test]
    fn test_unresolved_marker_disables_the_rule() {
        let universe = TypeUniverse::new();
        let engine = AnalysisEngine::new(&universe);
        assert!(engine.rules().is_empty());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let model = violating_model();
        let engine = AnalysisEngine::new(&model.universe());

        let first = engine.analyze(&model);
        let second = engine.analyze(&model);

        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.methods_analyzed, second.methods_analyzed);
        assert_eq!(first.methods_flagged, second.methods_flagged);
    }

    #[test]
    fn test_analyze_counts() {
        let model = violating_model().with_method(MethodSignature::new(
            "App.Service.Stop",
            SourceLocation::new("svc.cs", 9, 17),
        ));
        let engine = AnalysisEngine::new(&model.universe());

        let result = engine.analyze(&model);
        assert_eq!(result.methods_analyzed, 2);
        assert_eq!(result.methods_flagged, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.rules_active, 1);
        assert_eq!(result.unit.as_deref(), Some("App"));
        assert_eq!(result.count_at(Severity::Warning), 1);
        // Warnings are not blocking
        assert!(result.is_clean);
        assert!(!result.is_silent());
    }

    #[test]
    fn test_no_rules_means_no_diagnostics() {
        let model = violating_model();
        let engine = AnalysisEngine::empty();

        let result = engine.analyze(&model);
        assert!(result.is_silent());
        assert_eq!(result.rules_active, 0);
        assert_eq!(result.methods_analyzed, 1);
    }

    #[test]
    fn test_sink_receives_each_diagnostic() {
        let model = violating_model();
        let engine = AnalysisEngine::new(&model.universe());

        let mut buffer = DiagnosticBuffer::new();
        let reported = engine.analyze_with_sink(&model, &mut buffer);
        assert_eq!(reported, 1);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.diagnostics()[0].rule_id, "CT1001");
    }
}
