//! NetReport - network inventory status reports
//!
//! A CLI tool that reads a network inventory document and writes a
//! structured status report for network operations staff.
//!
//! Exit codes:
//!   0 - Success (no devices above threshold, or no --fail-on set)
//!   1 - Runtime error (unreadable or invalid inventory, write failure, etc.)
//!   2 - Devices found at or above the --fail-on status

mod analysis;
mod cli;
mod config;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, FailOnLevel, OutputFormat};
use config::Config;
use models::{Inventory, NetworkReport};
use report::{Clock, SystemClock};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so `[general] verbose` can raise the log level
    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("NetReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    match run_report(&config, args.fail_on, &SystemClock) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .netreport.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!(
        "Created {} with default settings.",
        config::DEFAULT_CONFIG_FILE
    );
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so a report written to stdout stays clean.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow. Returns exit code (0 or 2).
fn run_report(config: &Config, fail_on: Option<FailOnLevel>, clock: &dyn Clock) -> Result<i32> {
    info!("Reading inventory: {}", config.general.input.display());
    let inventory = Inventory::load(&config.general.input)?;
    info!(
        "Loaded {} locations with {} devices",
        inventory.locations.len(),
        inventory.device_count()
    );

    let report = report::build_report(&inventory, clock);

    if config.writes_to_stdout() {
        let stdout = std::io::stdout();
        write_report(&mut stdout.lock(), &report, config)?;
    } else {
        let path = &config.general.output;
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        write_report(&mut BufWriter::new(file), &report, config)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report saved to: {}", path.display());
    }

    let stats = &report.stats;
    info!(
        "{} devices: {} offline, {} warning, {} low uptime, {} switches above port threshold",
        stats.total_devices,
        stats.status.offline.len(),
        stats.status.warning.len(),
        stats.low_uptime.len(),
        stats.high_port_usage.len()
    );

    // Check --fail-on threshold
    if let Some(level) = fail_on {
        if exceeds_fail_level(&report, level) {
            warn!(
                "Devices found at or above {:?} status. Failing (exit code 2).",
                level
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Write the report in the configured format.
fn write_report<W: Write>(out: &mut W, report: &NetworkReport, config: &Config) -> Result<()> {
    match config.report.format {
        OutputFormat::Text => {
            report::write_text_report(out, report, &config.report.timestamp_format)?
        }
        OutputFormat::Json => {
            let json = report::generate_json_report(report)?;
            writeln!(out, "{}", json)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Whether any device is at or above the given status.
fn exceeds_fail_level(report: &NetworkReport, level: FailOnLevel) -> bool {
    let status = &report.stats.status;
    match level {
        FailOnLevel::Offline => !status.offline.is_empty(),
        FailOnLevel::Warning => !status.offline.is_empty() || !status.warning.is_empty(),
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so failures are returned, not logged.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(args);
    Ok(config)
}
