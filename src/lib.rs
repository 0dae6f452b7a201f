//! Cancellation Analysis
//!
//! A static-analysis rule that flags methods taking a cancellation token in
//! any position other than the last (non-variadic) parameter, keeping token
//! usage visually and semantically last at call sites.
//!
//! ## Features
//!
//! - **Pure rule evaluation**: a stateless, side-effect-free evaluator safe
//!   to invoke concurrently across methods and compilation units
//! - **Run-scoped marker resolution**: the token type is resolved once per
//!   analysis run; an unresolvable marker silently disables the rule
//! - **Variadic exemption**: a trailing `params`-style parameter is exempt
//!   from the ordering requirement
//! - **Pluggable host seams**: `SymbolProvider` supplies signatures,
//!   `DiagnosticSink` receives findings
//! - **CLI support**: analyze and inspect serialized symbol models in JSON,
//!   YAML, or TOML with table/JSON/YAML output
//!
//! ## Architecture
//!
//! The crate is an explicit two-stage pipeline rather than a host-registered
//! callback:
//!
//! 1. **Symbols** (`symbols`): type identities, method signatures, the type
//!    universe, and the `SymbolProvider` seam.
//!
//! 2. **Engine** (`engine`): run-scoped setup (marker resolution gating) and
//!    per-method rule evaluation, aggregated into an `AnalysisResult`.
//!
//! 3. **Rules** (`engine::rules`): the rule framework and the
//!    trailing-token rule itself.
//!
//! 4. **CLI** (`cli`): command-line host for analyzing serialized symbol
//!    models.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Analyze a symbol model
//! ct-analyze analyze --model app.json --format table
//!
//! # Analyze with a custom marker type, warnings as errors
//! ct-analyze analyze --model app.yaml --marker-type app.Context --strict
//!
//! # Inspect model structure
//! ct-analyze inspect --model app.json --format yaml
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cancellation_analysis::{
//!     AnalysisEngine, MethodSignature, ParameterDescriptor, SourceLocation, SymbolModel,
//! };
//!
//! let model = SymbolModel::new().with_unit("App").with_method(
//!     MethodSignature::new("App.Service.Run", SourceLocation::new("svc.cs", 3, 17))
//!         .with_parameter(ParameterDescriptor::of_type(
//!             "System.Threading.CancellationToken",
//!         ))
//!         .with_parameter(ParameterDescriptor::of_type("System.Int32")),
//! );
//!
//! let engine = AnalysisEngine::new(&model.universe());
//! let result = engine.analyze(&model);
//!
//! assert_eq!(result.diagnostics.len(), 1);
//! assert!(result.diagnostics[0].message.contains("App.Service.Run"));
//! ```

// Core modules
pub mod cli;
pub mod engine;
pub mod error;
pub mod symbols;

// Re-export engine types
pub use engine::{AnalysisEngine, AnalysisResult};

// Re-export rule framework types
pub use engine::rules::{
    BoxedRule, Diagnostic, DiagnosticBuffer, DiagnosticSink, Rule, Severity,
};

// Re-export the trailing-token rule
pub use engine::rules::token_position::{
    ReportMode, TokenPositionConfig, TokenPositionRule, DEFAULT_MARKER_TYPE, DEFAULT_RULE_ID,
};

// Re-export symbol model types
pub use symbols::{
    MethodSignature, ParameterDescriptor, SourceLocation, SymbolModel, SymbolProvider,
    TypeIdentity, TypeUniverse,
};

// Re-export CLI types for command-line usage
pub use cli::{AnalyzeCli, AnalyzeCommands, ExitCode, OutputFormat};

// Re-export error types
pub use error::{AnalyzerError, Result};

/// Analyzer version (from Cargo.toml)
pub const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use cancellation_analysis::{run_cli, AnalyzeCli};
///
/// fn main() {
///     let cli = AnalyzeCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: AnalyzeCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                ExitCode::InvalidInput
            } else {
                ExitCode::InternalError
            }
        }
    }
}
