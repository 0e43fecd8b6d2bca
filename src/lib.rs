//! # Displacement Monitor
//!
//! Batch stationarity analysis and forecasting for displacement monitoring
//! series.
//!
//! Each column of a structure's monitoring file becomes a [`Series`]. The
//! batch pipeline decomposes it, runs an augmented Dickey-Fuller test and
//! forecasts six months ahead with a seasonal ARIMA model when the series is
//! stationary or a Bayesian additive model when it is not. Results are
//! written as SVG reports and charts.
//!
//! ## Quick start
//!
//! ```no_run
//! use displacement_monitor::prelude::*;
//! use std::path::Path;
//!
//! let pipeline = BatchPipeline::new(
//!     SeriesLoader::default(),
//!     AdfTest::new(),
//!     NullChartRenderer,
//!     "output",
//! );
//! let summary = pipeline.run(Path::new("data"), &["dd_abra"])?;
//! println!("{} series analysed", summary.completed());
//! # Ok::<(), displacement_monitor::Error>(())
//! ```

pub mod config;
pub mod output;
pub mod pipeline;

// Re-export member crates
pub use displacement_data as data;
pub use displacement_decompose as decompose;
pub use displacement_forecast as forecast;
pub use displacement_report as report;
pub use displacement_stationarity as stationarity;

pub use displacement_core::{calendar, constants, Error, Observation, Result, Series};

pub use config::PipelineConfig;
pub use output::{OutputLayout, SeriesArtifacts};
pub use pipeline::{BatchPipeline, BatchSummary, DatasetSummary, SeriesOutcome};

/// Commonly used items
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::pipeline::{BatchPipeline, BatchSummary, SeriesOutcome};
    pub use displacement_core::{Error, Result, Series};
    pub use displacement_data::{LoaderOptions, SeriesLoader};
    pub use displacement_decompose::SeasonalDecomposer;
    pub use displacement_forecast::{ForecastModel, ForecastResult, ModelKind, ModelSelector};
    pub use displacement_report::{NullChartRenderer, ReportRenderer, SvgChartRenderer};
    pub use displacement_stationarity::{AdfTest, StationarityTest};
}
