//! CLI entry point for the sprint productivity estimator.

use agile_artifacts::ArtifactBundle;
use agile_pipeline::{
    loader, schema, EstimatorConfig, FilterEngine, FilterSpec, Pipeline, Session,
};
use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use polars::io::csv::write::CsvWriter;
use polars::prelude::*;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Environment variable naming the artifact bundle directory.
const ARTIFACTS_ENV: &str = "AGILE_ARTIFACTS_DIR";

#[derive(Parser, Debug)]
#[command(
    author = "Agile Estimator Team",
    version,
    about = "Sprint productivity estimation from historical team data",
    long_about = "Estimates team productivity for each sprint in a CSV export\n\
                  using a pre-trained regression model.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  AGILE_ARTIFACTS_DIR    Directory with model.json, scaler.json, encoder.json\n\n\
                  EXAMPLES:\n  \
                  # Estimate and save predictions\n  \
                  agile-estimator -i sprints.csv -o predicted.csv\n\n  \
                  # Filtered view over Web sprints only\n  \
                  agile-estimator -i sprints.csv --domains Web --chart-csv chart.csv\n\n  \
                  # Machine-readable summary\n  \
                  agile-estimator -i sprints.csv --json"
)]
struct Args {
    /// Path to the sprint CSV file to process
    #[arg(short, long)]
    input: String,

    /// Directory holding the model/scaler/encoder artifacts
    ///
    /// Defaults to $AGILE_ARTIFACTS_DIR, then "artifacts"
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Write the predicted table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the chart-bound (filtered, possibly sampled) rows to this CSV file
    #[arg(long)]
    chart_csv: Option<PathBuf>,

    /// Lower bound of the predicted-productivity filter
    #[arg(long)]
    range_min: Option<f64>,

    /// Upper bound of the predicted-productivity filter
    #[arg(long)]
    range_max: Option<f64>,

    /// Comma-separated domains to keep (default: all)
    #[arg(long)]
    domains: Option<String>,

    /// Comma-separated sprint ids to keep (default: all)
    #[arg(long)]
    sprints: Option<String>,

    /// Maximum rows handed to charting before down-sampling
    #[arg(long, default_value = "500")]
    chart_cap: usize,

    /// Seed for the deterministic chart sample
    #[arg(long, default_value = "42")]
    chart_seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let artifact_dir = args
        .artifacts
        .clone()
        .or_else(|| env::var(ARTIFACTS_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    let config = EstimatorConfig::builder()
        .artifact_dir(artifact_dir)
        .chart_row_cap(args.chart_cap)
        .chart_sample_seed(args.chart_seed)
        .build()?;

    info!("Loading artifacts from {}", config.artifact_dir.display());
    let bundle = Arc::new(
        ArtifactBundle::load(&config.artifact_dir)
            .map_err(|e| anyhow!("could not load artifacts [{}]: {}", e.error_code(), e))?,
    );

    info!("Loading dataset from {}", args.input);
    let upload = loader::load_csv_path(&args.input)
        .map_err(|e| anyhow!("could not load dataset [{}]: {}", e.error_code(), e))?;
    info!("Dataset loaded: {:?}", upload.shape());

    let pipeline = Pipeline::builder().artifacts(bundle).build()?;
    let mut session = Session::new(upload);

    let summary = session
        .estimate(&pipeline)
        .map_err(|e| anyhow!("estimation failed [{}]: {}", e.error_code(), e))?
        .clone();

    if let Some(ref path) = args.output {
        write_csv(&mut session.working().clone(), path)?;
        info!("Predictions written to {}", path.display());
    }

    let spec = build_filter_spec(&args, session.working())
        .map_err(|e| anyhow!("invalid filter [{}]: {}", e.error_code(), e))?;
    let view = FilterEngine::new(&config)
        .apply(session.working(), &spec)
        .map_err(|e| anyhow!("filtering failed [{}]: {}", e.error_code(), e))?;

    if let Some(ref path) = args.chart_csv {
        write_csv(&mut view.chart_sample.clone(), path)?;
        info!("Chart rows written to {}", path.display());
    }

    if args.json {
        let report = serde_json::json!({
            "run": summary,
            "filter": {
                "prediction_range": spec.prediction_range,
                "domains": spec.domains,
                "sprints": spec.sprints.len(),
                "total_matching": view.total_matching,
                "chart_rows": view.chart_sample.height(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&summary, view.total_matching, view.chart_sample.height());

    Ok(())
}

/// Build the filter specification from CLI flags, defaulting each
/// dimension to "everything" like the interactive view does.
fn build_filter_spec(
    args: &Args,
    predicted: &DataFrame,
) -> agile_pipeline::EstimatorResult<FilterSpec> {
    let mut spec = FilterSpec::matching_all(predicted)?;

    let (default_lo, default_hi) = spec.prediction_range;
    if args.range_min.is_some() || args.range_max.is_some() {
        spec = spec.with_range(
            args.range_min.unwrap_or(default_lo),
            args.range_max.unwrap_or(default_hi),
        );
    }
    if let Some(ref domains) = args.domains {
        spec = spec.with_domains(split_list(domains));
    }
    if let Some(ref sprints) = args.sprints {
        spec = spec.with_sprints(split_list(sprints));
    }

    Ok(spec)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn write_csv(df: &mut DataFrame, path: &PathBuf) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Print a human-readable summary of the run.
///
/// Note: this uses `println!` intentionally for user-facing CLI output;
/// unlike logging it should always be visible regardless of log level.
fn print_summary(summary: &agile_pipeline::RunSummary, total_matching: usize, chart_rows: usize) {
    println!();
    println!("{}", "=".repeat(60));
    println!("ESTIMATION COMPLETE");
    println!("{}", "=".repeat(60));
    println!();
    println!("Model: v{}", summary.model_version);
    println!("Sprints estimated: {}", summary.rows);
    println!("Duration: {}ms", summary.duration_ms);
    println!(
        "Predicted {}: {:.2} .. {:.2} (mean {:.2})",
        schema::PRODUTIVIDADE_PREVISTA,
        summary.prediction_min,
        summary.prediction_max,
        summary.prediction_mean
    );
    println!();
    println!("Records after filters: {}", total_matching);
    if chart_rows < total_matching {
        println!("Chart sample: {} rows (down-sampled)", chart_rows);
    }
    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(60));
}
