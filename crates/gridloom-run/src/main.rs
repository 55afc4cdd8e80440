//! Gridloom Run - executes a generation model and writes frames to a sink
//!
//! The binary ships a small built-in growth model so the whole execution
//! path can be driven without an external engine crate.

use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridloom_model::{ExecutionSettings, GridDefinition, ModelCatalog, ModelDefinition};
use gridloom_runtime::{EngineRunner, GenerationSink};

mod demo;
mod sinks;

use demo::{DemoCatalog, GrowthFactory};
use sinks::{JsonSink, TextSink};

#[derive(Parser, Debug)]
#[command(name = "gridloom-run")]
#[command(about = "Run a gridloom generation model")]
struct Cli {
    /// Name of the built-in model to run
    #[arg(long, default_value = "growth")]
    model: String,

    /// Grid width
    #[arg(long, default_value = "31")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "15")]
    height: usize,

    /// Number of independent runs
    #[arg(long, default_value = "1")]
    runs: usize,

    /// Step cap per run (defaults depend on the frame mode)
    #[arg(long)]
    steps: Option<usize>,

    /// Explicit seeds; runs beyond the list get randomized seeds
    #[arg(long)]
    seed: Vec<u64>,

    /// Emit every intermediate frame instead of only the final one
    #[arg(long)]
    frames: bool,

    /// Directory to mirror final frames into as text files
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit frames as JSON lines instead of rendered text
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridloom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let catalog = match build_catalog(&cli) {
        Ok(catalog) => catalog,
        Err(message) => {
            error!("invalid model configuration: {}", message);
            std::process::exit(1);
        }
    };

    let Some(model) = catalog.find(&cli.model) else {
        error!(
            "unknown model '{}', available: {}",
            cli.model,
            catalog.names().join(", ")
        );
        std::process::exit(1);
    };

    let mut sink: Box<dyn GenerationSink<char>> = if cli.json {
        Box::new(JsonSink)
    } else {
        Box::new(TextSink::new(cli.output.clone()))
    };

    let factory = GrowthFactory;
    let runner = EngineRunner::new(&factory);
    if let Err(e) = runner.run(model, sink.as_mut()) {
        error!("run failed: {}", e);
        std::process::exit(1);
    }
}

fn build_catalog(cli: &Cli) -> Result<DemoCatalog, String> {
    let grid = GridDefinition::with_charset(cli.width, cli.height, 1, "BW")
        .map_err(|error| error.to_string())?;

    let mut execution = ExecutionSettings::builder()
        .runs(cli.runs)
        .emit_gif(cli.frames);
    if let Some(steps) = cli.steps {
        execution = execution.steps(steps);
    }
    if !cli.seed.is_empty() {
        execution = execution.seeds(cli.seed.clone());
    }
    let execution = execution.build().map_err(|error| error.to_string())?;

    // Same growth rule; "growth" expands from the grid centre, "scatter"
    // from a random seed cell.
    Ok(DemoCatalog::new(vec![
        ModelDefinition::new("growth", grid.clone(), execution.clone()).with_origin(true),
        ModelDefinition::new("scatter", grid, execution),
    ]))
}
