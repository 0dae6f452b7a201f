//! Cancellation Analysis CLI
//!
//! Command-line interface for the trailing-cancellation-token rule.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a symbol model
//! ct-analyze analyze --model app.json
//!
//! # Analyze with a custom marker type, warnings as errors
//! ct-analyze analyze --model app.yaml --marker-type app.Context --strict
//!
//! # Inspect model structure
//! ct-analyze inspect --model app.json --format yaml
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - no findings
//! - 1: Findings at error severity
//! - 2: Findings at warning severity
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Symbol model errors
//! - 10: Internal error

use cancellation_analysis::{run_cli, AnalyzeCli};
use clap::Parser;

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    // Parse CLI arguments
    let cli = AnalyzeCli::parse();

    // Run the CLI and exit with appropriate code
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
