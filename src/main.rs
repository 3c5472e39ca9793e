//! Pointstat - Qdrant collection export analyzer
//!
//! A CLI tool that reads the batch files of a Qdrant scroll export,
//! aggregates statistics over the point payloads and prints a report.
//! It also serves static files with CORS enabled for local front-ends.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing or malformed batch file, bad config, bind failure, etc.)

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;
mod server;

use analysis::CollectionStats;
use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use loader::BatchSource;
use report::ReportContext;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
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

    // Initialize logging
    init_logging(&args);

    debug!("Pointstat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .pointstat.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to point at your batch exports and collection.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.command {
        Some(Command::Report { ref output, .. }) => {
            run_report(&config, output.clone(), args.quiet)
        }
        Some(Command::Serve { .. }) => server::run_server(&config.server).await,
        None => Ok(()),
    }
}

/// Load, aggregate and emit the collection report.
fn run_report(config: &Config, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    let source = BatchSource::from(&config.input);
    let points = loader::load_points(&source, !quiet)?;

    if points.is_empty() {
        warn!("Batch files contained no points");
    }

    let stats = CollectionStats::from_points(&points);
    info!(
        "Aggregated {} points from {} unique files",
        stats.total_points,
        stats.files.len()
    );

    let ctx = ReportContext::new(&config.collection, &config.report);
    let report = report::build_report(&stats, points.first(), &ctx);

    let rendered = match config.report.format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match output {
        Some(path) => {
            report::write_report(&rendered, &path)?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
