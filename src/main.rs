use anyhow::Context;
use clap::Parser;
use displacement_monitor::prelude::*;
use displacement_report::ChartRenderer;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Stationarity analysis and forecasting of displacement monitoring series
#[derive(Parser, Debug)]
#[command(name = "displacement-monitor", version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding `<structure>.csv` files
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Root directory of the generated reports and charts
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Field separator of the input files
    #[arg(long, value_name = "C")]
    separator: Option<char>,

    /// Skip decomposition and forecast charts
    #[arg(long)]
    no_charts: bool,

    /// Structures to analyse (defaults to the configured list)
    #[arg(value_name = "STRUCTURE")]
    structures: Vec<String>,
}

impl Cli {
    fn resolve(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(separator) = self.separator {
            config.loader.separator = separator;
        }
        if self.no_charts {
            config.charts = false;
        }
        if !self.structures.is_empty() {
            config.structures = self.structures;
        }
        Ok(config)
    }
}

fn run(config: &PipelineConfig) -> anyhow::Result<BatchSummary> {
    let svg_charts = SvgChartRenderer::default();
    let charts: &dyn ChartRenderer = if config.charts { &svg_charts } else { &NullChartRenderer };

    let pipeline = BatchPipeline::new(
        SeriesLoader::new(config.loader.clone()),
        AdfTest::new(),
        charts,
        &config.output_dir,
    );
    pipeline
        .run(&config.data_dir, &config.structures)
        .context("batch aborted")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Cli::parse().resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        structures = config.structures.len(),
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "starting batch"
    );

    match run(&config) {
        Ok(summary) if !summary.has_load_failures() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(failed = summary.failed_datasets.len(), "some datasets could not be loaded");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
