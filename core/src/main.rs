//! Batch accelerometer simulation CLI.
//!
//! Loads a reference trajectory from CSV and an error profile from a JSON/YAML/TOML
//! file, synthesizes the measurement sequence, and writes it back out as CSV. Without
//! a profile file a representative quality-grade preset is used instead.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use accelsim::profile::AccelErrorProfile;
use accelsim::sim::simulate_accelerometer;
use accelsim::trajectory::ReferenceTrajectory;
use accelsim::AccelQuality;

#[derive(Parser)]
#[command(
    name = "accelsim",
    about = "Synthesize body-frame accelerometer measurements from a reference trajectory"
)]
struct Cli {
    /// Reference trajectory CSV file
    #[arg(short, long)]
    trajectory: PathBuf,
    /// Error profile file (.json/.yaml/.yml/.toml); mutually exclusive with --quality
    #[arg(short, long, conflicts_with = "quality")]
    profile: Option<PathBuf>,
    /// Quality-grade preset (consumer, industrial, tactical, navigation, strategic)
    #[arg(short, long)]
    quality: Option<String>,
    /// Sampling rate in Hz used with --quality presets
    #[arg(long, default_value_t = 100.0)]
    sample_freq: f64,
    /// Output CSV file for the simulated measurements
    #[arg(short, long)]
    output: PathBuf,
    /// Override the profile's random seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logger(log_level: &str) {
    use std::io::Write;
    let level = log_level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{log_level}', defaulting to 'info'");
        log::LevelFilter::Info
    });
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });
    builder.init();
}

fn parse_quality(name: &str) -> Result<AccelQuality, String> {
    match name.to_lowercase().as_str() {
        "consumer" => Ok(AccelQuality::Consumer),
        "industrial" => Ok(AccelQuality::Industrial),
        "tactical" => Ok(AccelQuality::Tactical),
        "navigation" => Ok(AccelQuality::Navigation),
        "strategic" => Ok(AccelQuality::Strategic),
        other => Err(format!(
            "unknown quality grade '{other}' (expected consumer, industrial, tactical, navigation, or strategic)"
        )),
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = match (&cli.profile, &cli.quality) {
        (Some(path), _) => AccelErrorProfile::from_file(path)?,
        (None, Some(grade)) => parse_quality(grade)?.error_profile(cli.sample_freq),
        (None, None) => {
            return Err("provide either --profile or --quality".into());
        }
    };
    if let Some(seed) = cli.seed {
        profile.seed = seed;
    }
    profile.validate()?;

    let trajectory = ReferenceTrajectory::from_csv(&cli.trajectory)?;
    info!(
        "loaded {} trajectory epochs from {}",
        trajectory.len(),
        cli.trajectory.display()
    );

    let mut rng = StdRng::seed_from_u64(profile.seed);
    let simulated = simulate_accelerometer(&trajectory, &profile, &mut rng)?;
    info!(
        "synthesized {} measurements via {:?} (seed {})",
        simulated.len(),
        simulated.source,
        profile.seed
    );

    simulated.to_csv(&cli.output)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli.log_level);
    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}
