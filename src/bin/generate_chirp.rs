use anyhow::{Context, Result};
use clap::Parser;
use rand::RngExt;
use std::fs;
use std::path::PathBuf;

use cafsurf::samples::write_complex_samples;
use cafsurf::simulation::{
    ChirpConfig, create_rng, generate_chirp_with_rng, haystack_file_name, needle_file_name,
    shifted_copy,
};

#[derive(Parser, Debug)]
#[command(name = "generate_chirp")]
#[command(about = "Generate chirp captures with known lag and frequency offset")]
struct Args {
    /// TOML chirp configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Number of needle/haystack pairs
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Samples per chirp
    #[arg(long)]
    length: Option<usize>,

    /// Largest injected frequency offset magnitude in Hz
    #[arg(long, default_value_t = 100.0)]
    max_fdoa: f64,

    /// Smallest injected lag in samples
    #[arg(long, default_value_t = 7)]
    min_lag: usize,

    /// Largest injected lag in samples (exclusive)
    #[arg(long, default_value_t = 256)]
    max_lag: usize,

    /// Zeros appended after the delayed chirp
    #[arg(long, default_value_t = 96)]
    trailing: usize,

    /// Per-component noise standard deviation added to each haystack
    #[arg(long, default_value_t = 1e-5)]
    noise_std: f64,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    needle: String,
    haystack: String,
    lag_samples: usize,
    fdoa_hz: f64,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    chirp: ChirpConfig,
    noise_std: f64,
    trailing: usize,
    files: Vec<ManifestEntry>,
}

fn load_chirp_config(args: &Args) -> Result<ChirpConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        }
        None => ChirpConfig::default(),
    };
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.min_lag >= args.max_lag {
        anyhow::bail!("lag range {}..{} is empty", args.min_lag, args.max_lag);
    }
    if !(args.max_fdoa.is_finite() && args.max_fdoa > 0.0) {
        anyhow::bail!("max fdoa must be positive, got {}", args.max_fdoa);
    }

    let config = load_chirp_config(&args)?;
    let mut rng = create_rng(config.seed);

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    println!(
        "Generating {} chirps of {} samples at {} Hz",
        args.count, config.length, config.sample_rate
    );
    println!("Output: {}", args.output_dir.display());

    let mut entries = Vec::with_capacity(args.count);
    for index in 0..args.count {
        let lag = rng.random_range(args.min_lag..args.max_lag);
        let fdoa_hz = rng.random_range(-args.max_fdoa..args.max_fdoa);

        let chirp = generate_chirp_with_rng(&config, &mut rng);
        let haystack = shifted_copy(
            &chirp,
            lag,
            args.trailing,
            fdoa_hz,
            config.sample_rate,
            args.noise_std,
            &mut rng,
        )?;

        let needle_name = needle_file_name(index);
        let haystack_name = haystack_file_name(index, lag, fdoa_hz);
        write_complex_samples(args.output_dir.join(&needle_name), &chirp)?;
        write_complex_samples(args.output_dir.join(&haystack_name), &haystack)?;
        log::info!("{}: lag {}, fdoa {:.2} Hz", haystack_name, lag, fdoa_hz);

        entries.push(ManifestEntry {
            needle: needle_name,
            haystack: haystack_name,
            lag_samples: lag,
            fdoa_hz,
        });
    }

    if args.manifest {
        let manifest = Manifest {
            chirp: config,
            noise_std: args.noise_std,
            trailing: args.trailing,
            files: entries,
        };
        let path = args.output_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json).context("Failed to write manifest")?;
        println!("Manifest: {}", path.display());
    }

    println!("Done.");
    Ok(())
}
