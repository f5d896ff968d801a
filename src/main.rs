use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cafsurf::caf::ExecutionStrategy;
use cafsurf::config::CafConfig;
use cafsurf::dump::write_surface;
use cafsurf::output::{OutputFormat, create_formatter};
use cafsurf::processing::CafProcessor;
use cafsurf::samples::SampleFormat;
use cafsurf::signal_processing::SweepSpec;

#[derive(Parser, Debug)]
#[command(name = "cafsurf")]
#[command(about = "Estimate TDOA/FDOA between two captures", long_about = None)]
struct Args {
    /// Reference capture (needle)
    needle: Option<PathBuf>,

    /// Capture searched for the needle (haystack)
    haystack: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample rate of both captures in Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<f64>,

    /// Frequency sweep as start:stop[:step] in Hz (e.g. "-100:100:0.5")
    #[arg(long, allow_hyphen_values = true)]
    sweep: Option<SweepSpec>,

    /// First haystack sample to correlate
    #[arg(long)]
    window_start: Option<usize>,

    /// Haystack samples to take from the window start
    #[arg(long)]
    window_length: Option<usize>,

    /// Row scheduling: sequential, rayon, threads
    #[arg(short = 's', long, value_enum)]
    strategy: Option<ExecutionStrategy>,

    /// Worker threads (default: one per core)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the ambiguity surface as raw little-endian f64
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Needle file layout (default: guessed from extension)
    #[arg(long, value_enum)]
    needle_format: Option<SampleFormat>,

    /// Haystack file layout (default: guessed from extension)
    #[arg(long, value_enum)]
    haystack_format: Option<SampleFormat>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .init();

    let config = build_config(&args)?;
    let processor = CafProcessor::new(&config).context("Invalid configuration")?;

    log::info!(
        "sweeping {} frequency bins ({} Hz) at {} Hz",
        processor.sweep().len(),
        config.sweep,
        processor.sample_rate()
    );

    let run = processor
        .process_files(&config)
        .context("Failed to compute ambiguity surface")?;

    let formatter = create_formatter(config.output.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    println!("{}", formatter.format(&run.to_output()));

    if let Some(path) = &config.output.dump {
        write_surface(path, &run.surface)
            .with_context(|| format!("Failed to dump surface to {}", path.display()))?;
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<CafConfig> {
    let mut config = match &args.config {
        Some(path) => CafConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CafConfig::default(),
    };

    if let Some(needle) = &args.needle {
        config.input.needle = Some(needle.clone());
    }
    if let Some(haystack) = &args.haystack {
        config.input.haystack = Some(haystack.clone());
    }
    if let Some(format) = args.needle_format {
        config.input.needle_format = Some(format);
    }
    if let Some(format) = args.haystack_format {
        config.input.haystack_format = Some(format);
    }
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(sweep) = args.sweep {
        config.sweep = sweep;
    }
    if let Some(start) = args.window_start {
        config.window.start = start;
    }
    if let Some(length) = args.window_length {
        config.window.length = Some(length);
    }
    if let Some(strategy) = args.strategy {
        config.execution.strategy = strategy;
    }
    if args.workers.is_some() {
        config.execution.workers = args.workers;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(dump) = &args.dump {
        config.output.dump = Some(dump.clone());
    }

    if config.input.needle.is_none() || config.input.haystack.is_none() {
        anyhow::bail!(
            "Both a needle and a haystack file are required (arguments or [input] in config)"
        );
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
