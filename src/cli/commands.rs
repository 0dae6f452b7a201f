//! CLI command definitions for the analyzer
//!
//! Provides Clap-based command definitions for running the trailing-token
//! analysis over a symbol model and inspecting model structure.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::output::{AnalysisOutput, OutputFormat};
use super::ExitCode;
use crate::engine::rules::token_position::TokenPositionConfig;
use crate::engine::rules::Severity;
use crate::engine::AnalysisEngine;
use crate::error::AnalyzerError;
use crate::symbols::SymbolModel;

/// Cancellation Analysis CLI
///
/// Run the trailing-cancellation-token rule over a serialized symbol model,
/// or inspect a model's structure.
#[derive(Parser, Debug)]
#[command(name = "ct-analyze")]
#[command(about = "Cancellation Analysis - flag cancellation tokens that are not last", long_about = None)]
#[command(version)]
pub struct AnalyzeCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// Available analyzer commands
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Analyze a symbol model
    ///
    /// Resolves the marker type against the model's type universe and
    /// evaluates every method declaration. If the marker type is absent
    /// the rule does not run and the analysis reports no findings.
    Analyze {
        /// Path to the symbol model file
        #[arg(short, long)]
        model: PathBuf,

        /// Fully-qualified marker type name
        ///
        /// Defaults to the standard cancellation token type.
        #[arg(long)]
        marker_type: Option<String>,

        /// Output format for analysis results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,

        /// Treat warnings as errors for the exit code
        #[arg(long)]
        strict: bool,
    },

    /// Inspect a symbol model's structure
    ///
    /// Displays the compilation unit, known types, and every method
    /// signature the model declares.
    Inspect {
        /// Path to the symbol model file
        #[arg(short, long)]
        model: PathBuf,

        /// Output format for inspection results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Execute the analyze command
pub fn execute_analyze(
    model: PathBuf,
    marker_type: Option<String>,
    format: Option<OutputFormat>,
    strict: bool,
) -> Result<ExitCode, AnalyzerError> {
    let symbol_model = read_model(&model)?;

    let mut config = TokenPositionConfig::default();
    if let Some(marker_type) = marker_type {
        config = config.with_marker_type(marker_type);
    }

    let universe = symbol_model.universe();
    let engine = AnalysisEngine::with_config(&universe, config);
    let result = engine.analyze(&symbol_model);

    let output_format = format.unwrap_or(OutputFormat::Table);
    let output = AnalysisOutput::from_result(&result);
    output.render(output_format)?;

    let has_errors = result.count_at(Severity::Error) > 0;
    let has_warnings = result.count_at(Severity::Warning) > 0;

    if strict {
        Ok(ExitCode::from_findings(has_errors || has_warnings, false))
    } else {
        Ok(ExitCode::from_findings(has_errors, has_warnings))
    }
}

/// Execute the inspect command
pub fn execute_inspect(
    model: PathBuf,
    format: Option<OutputFormat>,
) -> Result<ExitCode, AnalyzerError> {
    let symbol_model = read_model(&model)?;

    let output_format = format.unwrap_or(OutputFormat::Table);
    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&symbol_model)
                .map_err(|e| AnalyzerError::SerializationError(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&symbol_model)
                .map_err(|e| AnalyzerError::SerializationError(e.to_string()))?;
            println!("{}", yaml);
        }
        OutputFormat::Table => {
            print_model_table(&symbol_model, &model);
        }
    }

    Ok(ExitCode::Success)
}

/// Read and parse a symbol model file
fn read_model(path: &Path) -> Result<SymbolModel, AnalyzerError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AnalyzerError::FileError(format!(
            "Failed to read model file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_model_file(path, &content)
}

/// Parse a symbol model based on its file extension
pub fn parse_model_file(path: &Path, content: &str) -> Result<SymbolModel, AnalyzerError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid JSON: {}", e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid YAML: {}", e))),
        "toml" => toml::from_str(content)
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid TOML: {}", e))),
        _ => Err(AnalyzerError::InvalidInput(format!(
            "Unsupported file format: {}. Supported formats: json, yaml, yml, toml",
            extension
        ))),
    }
}

/// Print model inspection results in table format
fn print_model_table(model: &SymbolModel, path: &Path) {
    use colored::Colorize;

    println!(
        "{}",
        format!("Symbol Model: {}", path.display()).green().bold()
    );
    println!();

    if let Some(unit) = &model.unit {
        println!("Unit: {}", unit.bold());
    }
    println!("Declared types: {}", model.types.len());
    println!("Methods: {}", model.methods.len());
    println!();

    if !model.methods.is_empty() {
        println!("{}", "Signatures:".cyan().bold());
        for method in &model.methods {
            println!("  {} {}", "-".blue(), method);
            println!("    {} {}", "At:".dimmed(), method.location.to_string().cyan());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_json() {
        let content = r#"{"unit": "App", "methods": []}"#;
        let path = PathBuf::from("model.json");
        let model = parse_model_file(&path, content).unwrap();
        assert_eq!(model.unit.as_deref(), Some("App"));
        assert!(model.methods.is_empty());
    }

    #[test]
    fn test_parse_model_yaml() {
        let content = "unit: App\ntypes:\n  - System.Threading.CancellationToken\n";
        let path = PathBuf::from("model.yaml");
        let model = parse_model_file(&path, content).unwrap();
        assert_eq!(model.unit.as_deref(), Some("App"));
        assert_eq!(model.types.len(), 1);
    }

    #[test]
    fn test_parse_model_toml() {
        let content = "unit = \"App\"\ntypes = [\"System.Int32\"]\n";
        let path = PathBuf::from("model.toml");
        let model = parse_model_file(&path, content).unwrap();
        assert_eq!(model.unit.as_deref(), Some("App"));
    }

    #[test]
    fn test_parse_model_unsupported() {
        let content = "some content";
        let path = PathBuf::from("model.txt");
        assert!(parse_model_file(&path, content).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = AnalyzeCli::try_parse_from([
            "ct-analyze",
            "analyze",
            "--model",
            "model.json",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            AnalyzeCommands::Analyze { model, strict, .. } => {
                assert_eq!(model, PathBuf::from("model.json"));
                assert!(strict);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_cli_parses_inspect() {
        let cli =
            AnalyzeCli::try_parse_from(["ct-analyze", "inspect", "--model", "model.yaml"]).unwrap();
        assert!(matches!(cli.command, AnalyzeCommands::Inspect { .. }));
    }
}
