//! CLI module for the Cancellation Analysis crate
//!
//! This module provides the command-line interface: running the analysis
//! over symbol model files and inspecting model structure.

pub mod commands;
pub mod output;

pub use commands::{AnalyzeCli, AnalyzeCommands};
pub use output::{AnalysisOutput, OutputFormat};

use crate::error::AnalyzerError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, no findings
    Success = 0,
    /// Analysis produced error-severity findings
    AnalysisError = 1,
    /// Analysis produced warning-severity findings
    AnalysisWarning = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Symbol model errors
    ModelError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from finding severities
    pub fn from_findings(has_errors: bool, has_warnings: bool) -> Self {
        if has_errors {
            ExitCode::AnalysisError
        } else if has_warnings {
            ExitCode::AnalysisWarning
        } else {
            ExitCode::Success
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: AnalyzeCli) -> Result<ExitCode, AnalyzerError> {
    match cli.command {
        AnalyzeCommands::Analyze {
            model,
            marker_type,
            format,
            strict,
        } => commands::execute_analyze(model, marker_type, format, strict),
        AnalyzeCommands::Inspect { model, format } => commands::execute_inspect(model, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::AnalysisError), 1);
        assert_eq!(i32::from(ExitCode::AnalysisWarning), 2);
    }

    #[test]
    fn test_exit_code_from_findings() {
        assert_eq!(ExitCode::from_findings(false, false), ExitCode::Success);
        assert_eq!(ExitCode::from_findings(true, false), ExitCode::AnalysisError);
        assert_eq!(
            ExitCode::from_findings(false, true),
            ExitCode::AnalysisWarning
        );
        assert_eq!(ExitCode::from_findings(true, true), ExitCode::AnalysisError);
    }
}
