//! CLI entry point for the Play Store data preparation pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use playstore_prep::{Pipeline, PipelineConfig, PipelineResult};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Play Store catalog and review data preparation",
    long_about = "Cleans the Google Play Store app catalog and user reviews, merges them \
                  and writes a single fact table.\n\n\
                  With no arguments the fixed paths are used:\n  \
                  data/googleplaystore.csv\n  \
                  data/googleplaystore_user_reviews.csv\n  \
                  -> data/prep_fact_data.csv\n\n\
                  EXAMPLES:\n  \
                  # Default run\n  \
                  playstore-prep\n\n  \
                  # Custom output and a JSON report next to it\n  \
                  playstore-prep -o out/fact.csv -r\n\n  \
                  # Machine-readable summary\n  \
                  playstore-prep --json | jq .merge"
)]
struct Args {
    /// App catalog CSV (default: data/googleplaystore.csv)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// User reviews CSV (default: data/googleplaystore_user_reviews.csv)
    #[arg(long)]
    reviews: Option<PathBuf>,

    /// Output CSV path (default: data/prep_fact_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file; command line paths override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the output location
    #[arg(short, long)]
    quiet: bool,

    /// Output the run report as JSON to stdout instead of the summary
    ///
    /// Disables all logs so stdout only carries JSON.
    #[arg(long)]
    json: bool,

    /// Write the run report as <output_stem>_report.json next to the output
    #[arg(short = 'r', long)]
    emit_report: bool,
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

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(path) = &args.catalog {
        config.catalog_path = path.clone();
    }
    if let Some(path) = &args.reviews {
        config.reviews_path = path.clone();
    }
    if let Some(path) = &args.output {
        config.output_path = path.clone();
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    info!("{}", "=".repeat(80));
    info!("Starting Play Store data preparation...");
    info!("{}", "=".repeat(80));

    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    handle_pipeline_output(&pipeline, &result, &args)
}

/// Output behavior:
/// - Default: print the stage summaries to stdout
/// - `--json`: print the report as JSON only
/// - `--emit-report`: also write the JSON report to a file
fn handle_pipeline_output(pipeline: &Pipeline, result: &PipelineResult, args: &Args) -> Result<()> {
    if args.emit_report {
        let report_path = pipeline.emit_report(&result.report)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        return Ok(());
    }

    if args.quiet {
        if let Some(path) = &result.report.output_file {
            println!("{}", path);
        }
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("PLAY STORE DATA PREPARATION");
    println!("{}\n", "=".repeat(80));
    print!("{}", result.report);
    println!("{}", "=".repeat(80));
    println!("Use --json for machine-readable output");

    Ok(())
}
