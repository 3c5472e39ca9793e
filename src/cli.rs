//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pointstat - statistics reports for Qdrant collection exports
///
/// Reads the batch files of a collection scroll export and prints a
/// report on categories, convergence chains, scores and data quality.
/// Also ships a small static file server with CORS enabled.
///
/// Examples:
///   pointstat report
///   pointstat report --dir ./exports --batches 6
///   pointstat report --discover --format json -o report.json
///   pointstat serve --port 8001 --dir ./site
///   pointstat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pointstat.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .pointstat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze batch exports and print the collection report
    Report {
        /// Directory holding the batch files
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Batch file name prefix (files are <PREFIX>_<N>.json)
        #[arg(long, value_name = "NAME")]
        prefix: Option<String>,

        /// Number of batch files to load
        #[arg(long, value_name = "COUNT", conflicts_with = "discover")]
        batches: Option<usize>,

        /// Load every <PREFIX>_<N>.json found in the directory
        #[arg(long)]
        discover: bool,

        /// Output format (text, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Serve a directory over HTTP with permissive CORS headers
    Serve {
        /// Interface to bind
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "POINTSTAT_PORT")]
        port: Option<u16>,

        /// Directory to serve
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            None => Err("A command is required (report or serve); see --help".to_string()),
            Some(Command::Report { batches, dir, .. }) => {
                if *batches == Some(0) {
                    return Err("Batch count must be at least 1".to_string());
                }
                if let Some(dir) = dir {
                    if !dir.is_dir() {
                        return Err(format!("Input directory does not exist: {}", dir.display()));
                    }
                }
                Ok(())
            }
            Some(Command::Serve { dir, .. }) => {
                if let Some(dir) = dir {
                    if !dir.is_dir() {
                        return Err(format!(
                            "Directory to serve does not exist: {}",
                            dir.display()
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let args = Args::parse_from(["pointstat", "report"]);
        assert!(args.validate().is_ok());
        match args.command {
            Some(Command::Report {
                batches,
                discover,
                format,
                output,
                ..
            }) => {
                assert!(batches.is_none());
                assert!(!discover);
                assert!(format.is_none());
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_batches_conflicts_with_discover() {
        let parsed =
            Args::try_parse_from(["pointstat", "report", "--batches", "3", "--discover"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validation_zero_batches() {
        let args = Args::parse_from(["pointstat", "report", "--batches", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_requires_command() {
        let args = Args::parse_from(["pointstat"]);
        assert!(args.validate().is_err());

        let init = Args::parse_from(["pointstat", "--init-config"]);
        assert!(init.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = Args::parse_from(["pointstat", "report", "-v", "-q"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::parse_from(["pointstat", "report"]);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
