//! Output formatting for the analyzer CLI
//!
//! Provides structured output in JSON, YAML, and human-readable table
//! formats with severity-based coloring for diagnostics.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::engine::rules::{Diagnostic, Severity};
use crate::engine::AnalysisResult;
use crate::error::AnalyzerError;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format for configuration output
    Yaml,
}

/// Analysis output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Whether the run produced no error-severity diagnostics
    pub clean: bool,
    /// Number of error diagnostics
    pub error_count: usize,
    /// Number of warning diagnostics
    pub warning_count: usize,
    /// Number of info diagnostics
    pub info_count: usize,
    /// Number of hint diagnostics
    pub hint_count: usize,
    /// Number of methods evaluated
    pub methods_analyzed: usize,
    /// Number of methods with at least one diagnostic
    pub methods_flagged: usize,
    /// Number of rules active for the run
    pub rules_active: usize,
    /// Emitted diagnostics
    pub diagnostics: Vec<DiagnosticOutput>,
    /// Summary message
    pub summary: String,
    /// Compilation unit, if the model named one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Run duration in milliseconds
    pub duration_ms: u64,
}

/// Individual diagnostic output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticOutput {
    /// Severity level
    pub severity: String,
    /// Rule identifier
    pub rule_id: String,
    /// Human-readable message
    pub message: String,
    /// Declaration location the diagnostic is anchored to
    pub location: String,
}

impl AnalysisOutput {
    /// Create output from an analysis result
    pub fn from_result(result: &AnalysisResult) -> Self {
        let error_count = result.count_at(Severity::Error);
        let warning_count = result.count_at(Severity::Warning);
        let info_count = result.count_at(Severity::Info);
        let hint_count = result.count_at(Severity::Hint);

        let clean = error_count == 0;

        let summary = if result.diagnostics.is_empty() {
            format!(
                "No issues found across {} method(s)",
                result.methods_analyzed
            )
        } else if clean {
            format!(
                "{} method(s) flagged with {} warning(s)",
                result.methods_flagged, warning_count
            )
        } else {
            format!(
                "{} method(s) flagged with {} error(s) and {} warning(s)",
                result.methods_flagged, error_count, warning_count
            )
        };

        let diagnostics = result
            .diagnostics
            .iter()
            .map(DiagnosticOutput::from_diagnostic)
            .collect();

        Self {
            clean,
            error_count,
            warning_count,
            info_count,
            hint_count,
            methods_analyzed: result.methods_analyzed,
            methods_flagged: result.methods_flagged,
            rules_active: result.rules_active,
            diagnostics,
            summary,
            unit: result.unit.clone(),
            duration_ms: result.duration_ms,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), AnalyzerError> {
        match format {
            OutputFormat::Json => self.render_json(),
            OutputFormat::Yaml => self.render_yaml(),
            OutputFormat::Table => self.render_table(),
        }
    }

    /// Render as JSON
    fn render_json(&self) -> Result<(), AnalyzerError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalyzerError::SerializationError(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }

    /// Render as YAML
    fn render_yaml(&self) -> Result<(), AnalyzerError> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AnalyzerError::SerializationError(e.to_string()))?;
        println!("{}", yaml);
        Ok(())
    }

    /// Render as human-readable table
    fn render_table(&self) -> Result<(), AnalyzerError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Cancellation Analysis".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        if let Some(unit) = &self.unit {
            writeln!(stdout, "Unit: {}", unit.bold()).ok();
        }
        writeln!(
            stdout,
            "Methods analyzed: {}  Rules active: {}",
            self.methods_analyzed, self.rules_active
        )
        .ok();
        writeln!(stdout).ok();

        let status_icon = if self.diagnostics.is_empty() {
            "+".green()
        } else if self.clean {
            "!".yellow()
        } else {
            "x".red()
        };
        writeln!(stdout, "{} {}", status_icon, self.summary).ok();

        if !self.diagnostics.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Diagnostics:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();

            for diagnostic in &self.diagnostics {
                diagnostic.render_table_row(&mut stdout)?;
            }
        }

        writeln!(stdout).ok();
        writeln!(
            stdout,
            "Completed in {}",
            format_duration(self.duration_ms).dimmed()
        )
        .ok();

        stdout.flush().ok();
        Ok(())
    }
}

impl DiagnosticOutput {
    /// Create from an emitted diagnostic
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity.to_string(),
            rule_id: diagnostic.rule_id.clone(),
            message: diagnostic.message.clone(),
            location: diagnostic.location.to_string(),
        }
    }

    /// Render a single diagnostic as a table row
    fn render_table_row(&self, stdout: &mut io::Stdout) -> Result<(), AnalyzerError> {
        writeln!(stdout).ok();
        writeln!(
            stdout,
            "{} [{}] {} {}",
            severity_icon(&self.severity),
            self.rule_id.dimmed(),
            severity_label(&self.severity),
            self.message
        )
        .ok();
        writeln!(stdout, "  {} {}", "At:".dimmed(), self.location.cyan()).ok();
        Ok(())
    }
}

/// Colored icon for a severity name
fn severity_icon(severity: &str) -> String {
    match severity {
        "error" => "x".red().to_string(),
        "warning" => "!".yellow().to_string(),
        "info" => "i".blue().to_string(),
        "hint" => "?".white().to_string(),
        _ => "-".white().to_string(),
    }
}

/// Colored label for a severity name
fn severity_label(severity: &str) -> String {
    match severity {
        "error" => "ERROR".red().bold().to_string(),
        "warning" => "WARNING".yellow().bold().to_string(),
        "info" => "INFO".blue().to_string(),
        "hint" => "HINT".white().to_string(),
        _ => severity.to_uppercase(),
    }
}

/// Format a duration in human-readable form
pub fn format_duration(ms: u64) -> String {
    if ms >= 60000 {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) / 1000;
        format!("{}m {}s", minutes, seconds)
    } else if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SourceLocation;

    fn result_with(diagnostics: Vec<Diagnostic>) -> AnalysisResult {
        AnalysisResult {
            is_clean: !diagnostics.iter().any(Diagnostic::is_blocking),
            diagnostics,
            unit: Some("App".to_string()),
            methods_analyzed: 3,
            methods_flagged: 1,
            rules_active: 1,
            duration_ms: 2,
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(500), "500ms");
        assert_eq!(format_duration(1500), "1.50s");
        assert_eq!(format_duration(65000), "1m 5s");
    }

    #[test]
    fn test_output_from_clean_result() {
        let output = AnalysisOutput::from_result(&result_with(vec![]));
        assert!(output.clean);
        assert_eq!(output.error_count, 0);
        assert_eq!(output.warning_count, 0);
        assert!(output.summary.contains("No issues"));
    }

    #[test]
    fn test_output_counts_by_severity() {
        let location = SourceLocation::new("svc.cs", 1, 1);
        let output = AnalysisOutput::from_result(&result_with(vec![
            Diagnostic::new("CT1001", Severity::Warning, "w", location.clone()),
            Diagnostic::new("CT1001", Severity::Error, "e", location),
        ]));
        assert!(!output.clean);
        assert_eq!(output.error_count, 1);
        assert_eq!(output.warning_count, 1);
        assert!(output.summary.contains("1 error(s)"));
    }

    #[test]
    fn test_diagnostic_output_fields() {
        let diagnostic = Diagnostic::new(
            "CT1001",
            Severity::Warning,
            "Method 'App.Run' should take CancellationToken as the last parameter",
            SourceLocation::new("svc.cs", 12, 5),
        );
        let output = DiagnosticOutput::from_diagnostic(&diagnostic);
        assert_eq!(output.severity, "warning");
        assert_eq!(output.rule_id, "CT1001");
        assert_eq!(output.location, "svc.cs:12:5");
    }
}
