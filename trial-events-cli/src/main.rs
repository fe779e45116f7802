//! Trial Events CLI Application
//!
//! This is the command-line interface for the trial event extractor.
//! It uses the trial-events library and adds:
//! - Argument parsing for the log path, markers and trial types
//! - Logging setup
//! - Table rendering (text, TSV, JSON)

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use trial_events::config::{DEFAULT_PREAMBLE_LINES, DEFAULT_TIME_UNITS_PER_SECOND};
use trial_events::{Extractor, ExtractorConfig};

mod report;

use report::OutputFormat;

/// Trial Events - Extract trial onsets and durations from presentation logs
#[derive(Parser, Debug)]
#[command(name = "trial-events")]
#[command(about = "Extract trial onsets and durations from presentation logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the tab-delimited presentation log
    #[arg(short, long, value_name = "FILE")]
    log: PathBuf,

    /// Marker whose time is the zero point for every onset
    #[arg(long, value_name = "NAME", default_value = "fMRI_T0")]
    start: String,

    /// Marker bounding the last event
    #[arg(long, value_name = "NAME", default_value = "END")]
    end: String,

    /// Trial type(s) of interest (can be repeated or comma-separated)
    #[arg(short = 't', long = "trial-type", value_name = "TYPE", value_delimiter = ',', required = true)]
    trial_types: Vec<String>,

    /// Metadata lines preceding the column header
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_PREAMBLE_LINES)]
    preamble_lines: usize,

    /// Raw log time units per second
    #[arg(long, value_name = "UNITS", default_value_t = DEFAULT_TIME_UNITS_PER_SECOND)]
    time_units_per_second: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Output file for the trial table (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::debug!("Trial Events CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using extractor library v{}", trial_events::VERSION);

    let config = build_config(&args);
    let extractor = Extractor::new(config).context("Invalid extraction parameters")?;

    let events = extractor
        .extract_file(&args.log)
        .with_context(|| format!("Failed to extract trial events from {:?}", args.log))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            report::render(&events, args.format, file)?;
            log::info!("Wrote {} trial events to {:?}", events.len(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            report::render(&events, args.format, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// Build the extractor configuration from command line arguments
fn build_config(args: &Args) -> ExtractorConfig {
    let trial_types = args
        .trial_types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty());

    ExtractorConfig::new(args.start.trim(), args.end.trim())
        .with_trial_types(trial_types)
        .with_preamble_lines(args.preamble_lines)
        .with_time_units_per_second(args.time_units_per_second)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
