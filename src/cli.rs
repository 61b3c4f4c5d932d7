//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// NetReport - network inventory status reports
///
/// Reads a network inventory (sites and their devices) and writes a
/// status digest: problem devices, uptime, port capacity, VLANs,
/// per-site counts and recommended follow-up.
///
/// Examples:
///   netreport
///   netreport --input inventory.json --output report.txt
///   netreport --input inventory.json --output - --format json
///   netreport --fail-on offline
///   netreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Inventory JSON file to read
    #[arg(short, long, value_name = "FILE", env = "NETREPORT_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file path for the report ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .netreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Exit with code 2 if devices at or above this status are found
    ///
    /// Useful for schedulers and CI. Values: warning, offline
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Generate a default .netreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text report (default)
    #[default]
    Text,
    /// JSON document of the report model
    Json,
}

/// Device status level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailOnLevel {
    /// Fail on warning or offline devices
    Warning,
    /// Fail on offline devices only
    Offline,
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

        if let Some(ref input) = self.input {
            if input.as_os_str().is_empty() {
                return Err("Input path must not be empty".to_string());
            }
            if input.is_dir() {
                return Err(format!("Input path is a directory: {}", input.display()));
            }
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path must not be empty".to_string());
            }
        }

        Ok(())
    }
}
