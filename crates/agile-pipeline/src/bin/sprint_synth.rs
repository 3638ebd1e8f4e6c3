//! CLI entry point for the synthetic sprint dataset generator.

use agile_pipeline::synth;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author = "Agile Estimator Team",
    version,
    about = "Generate synthetic sprint datasets for demos and testing",
    long_about = "Generates a seeded, reproducible sprint history CSV with\n\
                  the same column layout the estimator consumes.\n\n\
                  EXAMPLES:\n  \
                  # 100 sprints with the default seed\n  \
                  sprint-synth -o sprints_simuladas.csv\n\n  \
                  # A small deterministic fixture\n  \
                  sprint-synth -n 8 --seed 7 -o fixture.csv"
)]
struct Args {
    /// Number of sprints to generate
    #[arg(short = 'n', long, default_value = "100")]
    sprints: usize,

    /// Seed for reproducible generation
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output CSV path
    #[arg(short, long, default_value = "sprints_simuladas.csv")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if args.sprints == 0 {
        return Err(anyhow!("sprint count must be at least 1"));
    }

    info!(
        "Generating {} sprints (seed {})...",
        args.sprints, args.seed
    );
    let mut df = synth::generate_sprints(args.sprints, args.seed)
        .map_err(|e| anyhow!("generation failed [{}]: {}", e.error_code(), e))?;

    synth::write_csv(&mut df, &args.output)
        .map_err(|e| anyhow!("could not write output [{}]: {}", e.error_code(), e))?;

    println!(
        "Generated {} sprints -> {}",
        args.sprints,
        args.output.display()
    );

    Ok(())
}
