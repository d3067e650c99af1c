//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for clickstream-analytics using clap's derive macros.

use clap::{Parser, Subcommand, ValueEnum};

/// Clickstream analytics - user journeys and KPI reports over e-commerce events
#[derive(Parser)]
#[command(name = "clickstream-analytics")]
#[command(version)]
#[command(about = "E-commerce clickstream analytics backend", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create or upgrade the database schema
    Migrate,

    /// Print a user's journey as JSON
    Journey {
        /// User id
        user_id: String,

        /// Range start (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Print a KPI report as JSON
    Report {
        /// Report to compute
        #[arg(value_enum)]
        kind: ReportKind,

        /// Period token (today, yesterday, last_7_days, this_week, ...)
        #[arg(long, short = 'p')]
        period: String,

        /// Resolve the period against this instant instead of the current time (RFC3339)
        #[arg(long)]
        now: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// KPI reports available from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Traffic,
    Search,
    ProductAndCart,
    RevenueAndConversion,
    UserBehaviorAndFunnel,
}
