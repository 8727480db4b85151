//! CLI Error Handling
//!
//! Prints errors to the terminal with colors, walks the cause chain in
//! verbose mode and picks the process exit code.

//-----------------------------------------------------------------------------
// CLI Error Handling
//-----------------------------------------------------------------------------

use colored::Colorize;
use serde_json::{json, Value};

use cachepool_error::{CachePoolError, ErrorMessage, XmlConfigurationError};

/// Exit code for configuration and usage errors
pub const EXIT_CONFIGURATION: i32 = 1;

/// Exit code for internal consistency failures
pub const EXIT_DEFECT: i32 = 70;

/// Shared error handler for command line operations
#[derive(Debug, Clone)]
pub struct CliErrorHandler {
    pub verbose: bool,
    pub json: bool,
}

impl CliErrorHandler {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Report an error and return the exit code to use
    pub fn handle_error(&self, error: &anyhow::Error) -> i32 {
        let report = self.error_report(error);

        if self.json {
            eprintln!("{}", report);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), error);
            if self.verbose {
                if let Some(code) = report.get("code").and_then(Value::as_str) {
                    eprintln!("  {} {}", "code:".dimmed(), code);
                }
                for cause in error.chain().skip(1) {
                    eprintln!("  {} {}", "caused by:".yellow(), cause);
                }
            }
        }

        if is_defect(error) {
            EXIT_DEFECT
        } else {
            EXIT_CONFIGURATION
        }
    }

    /// Structured form of an error, with its code when it has one
    pub fn error_report(&self, error: &anyhow::Error) -> Value {
        match error.downcast_ref::<XmlConfigurationError>() {
            Some(xml) => {
                let message = ErrorMessage::from_error(xml);
                json!({
                    "error": message.message,
                    "code": message.code.to_string(),
                    "domain": message.domain.to_string(),
                    "defect": message.defect,
                })
            }
            None => json!({ "error": error.to_string() }),
        }
    }
}

fn is_defect(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<XmlConfigurationError>()
        .map(CachePoolError::is_defect)
        .unwrap_or(false)
}
