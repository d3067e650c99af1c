//! CLI interface module
//!
//! This module provides command-line interface functionality for clickstream-analytics.

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use commands::{config_generate, print_journey, print_report, run_migrate};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::AnalyticsError> for CliError {
    fn from(err: crate::errors::AnalyticsError) -> Self {
        if err.is_client_fault() {
            CliError::ParseError(err.to_string())
        } else {
            CliError::StorageError(err.to_string())
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is handled by the caller.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Migrate => run_migrate().await,

        Commands::Journey { user_id, from, to } => print_journey(&user_id, &from, &to).await,

        Commands::Report { kind, period, now } => print_report(kind, &period, now.as_deref()).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is not a one-shot command".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AnalyticsError;

    #[test]
    fn test_client_faults_become_parse_errors() {
        let err: CliError = AnalyticsError::invalid_period("bad").into();
        assert!(matches!(err, CliError::ParseError(_)));

        let err: CliError = AnalyticsError::store_unavailable("down").into();
        assert!(matches!(err, CliError::StorageError(_)));
        assert!(err.format_simple().starts_with("Storage error:"));
    }
}
