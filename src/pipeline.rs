//! Batch analysis of monitored structures
//!
//! For every structure the pipeline creates the output tree, loads the
//! dataset and runs each series through decomposition, the stationarity
//! test, the selected forecaster and the renderers. Series are independent:
//! a failing series is logged and the batch moves on.

use crate::output::{OutputLayout, SeriesArtifacts};
use displacement_core::constants::MIN_OBSERVATIONS;
use displacement_core::{Result, Series};
use displacement_data::SeriesLoader;
use displacement_decompose::SeasonalDecomposer;
use displacement_forecast::{ModelKind, ModelSelector, UntestedSeries};
use displacement_report::{ChartRenderer, Report, ReportRenderer};
use displacement_stationarity::StationarityTest;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// What happened to one series
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    /// All artifacts were written
    Completed {
        series_id: String,
        model: ModelKind,
        p_value: f64,
        files: Vec<PathBuf>,
    },
    /// Too short to analyse; nothing was written
    Skipped { series_id: String, observations: usize },
    /// Analysis or rendering failed; nothing was written
    Failed { series_id: String, reason: String },
}

impl SeriesOutcome {
    pub fn series_id(&self) -> &str {
        match self {
            Self::Completed { series_id, .. }
            | Self::Skipped { series_id, .. }
            | Self::Failed { series_id, .. } => series_id,
        }
    }
}

/// Outcomes of one structure
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub structure: String,
    pub outcomes: Vec<SeriesOutcome>,
}

/// Outcomes of a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub datasets: Vec<DatasetSummary>,
    /// Structures whose dataset could not be loaded, with the reason
    pub failed_datasets: Vec<(String, String)>,
}

impl BatchSummary {
    fn outcomes(&self) -> impl Iterator<Item = &SeriesOutcome> {
        self.datasets.iter().flat_map(|d| d.outcomes.iter())
    }

    pub fn completed(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, SeriesOutcome::Completed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, SeriesOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, SeriesOutcome::Failed { .. }))
            .count()
    }

    /// Whether any dataset failed to load
    pub fn has_load_failures(&self) -> bool {
        !self.failed_datasets.is_empty()
    }
}

/// Sequential batch job over a set of structures
///
/// Generic over the stationarity test and the chart renderer so runs can
/// swap in a fixed-outcome test or skip chart drawing.
#[derive(Debug, Clone)]
pub struct BatchPipeline<T, C> {
    loader: SeriesLoader,
    decomposer: SeasonalDecomposer,
    tester: T,
    selector: ModelSelector,
    charts: C,
    reports: ReportRenderer,
    output_root: PathBuf,
}

impl<T: StationarityTest, C: ChartRenderer> BatchPipeline<T, C> {
    pub fn new(loader: SeriesLoader, tester: T, charts: C, output_root: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            decomposer: SeasonalDecomposer::default(),
            tester,
            selector: ModelSelector::default(),
            charts,
            reports: ReportRenderer::default(),
            output_root: output_root.into(),
        }
    }

    pub fn with_selector(mut self, selector: ModelSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_report_renderer(mut self, reports: ReportRenderer) -> Self {
        self.reports = reports;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Process `<data_dir>/<structure>.csv` for every structure
    ///
    /// Only failing to create an output directory aborts the run; dataset
    /// load failures are recorded in the summary.
    pub fn run<S: AsRef<str>>(&self, data_dir: &Path, structures: &[S]) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        for structure in structures {
            let structure = structure.as_ref();
            let path = data_dir.join(format!("{structure}.csv"));
            let layout = OutputLayout::create(&self.output_root, structure).map_err(|e| {
                error!(structure, error = %e, "cannot create output directories");
                e
            })?;
            match self.process_dataset(structure, &path, &layout) {
                Ok(dataset) => summary.datasets.push(dataset),
                Err(e) => {
                    error!(structure, error = %e, "dataset skipped");
                    summary.failed_datasets.push((structure.to_string(), e.to_string()));
                }
            }
        }

        info!(
            completed = summary.completed(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            failed_datasets = summary.failed_datasets.len(),
            "batch finished"
        );
        Ok(summary)
    }

    /// Load one dataset and process each of its series
    #[instrument(skip(self, path, layout))]
    pub fn process_dataset(&self, structure: &str, path: &Path, layout: &OutputLayout) -> Result<DatasetSummary> {
        let dataset = self.loader.load_path(path)?;
        let outcomes = dataset
            .series
            .iter()
            .map(|series| self.process_series(series, layout))
            .collect();
        Ok(DatasetSummary {
            structure: structure.to_string(),
            outcomes,
        })
    }

    /// Analyse one series and write its artifacts
    pub fn process_series(&self, series: &Series, layout: &OutputLayout) -> SeriesOutcome {
        let series_id = series.id().to_string();
        if series.len() < MIN_OBSERVATIONS {
            warn!(
                series = %series_id,
                observations = series.len(),
                minimum = MIN_OBSERVATIONS,
                "not enough observations, series skipped"
            );
            return SeriesOutcome::Skipped {
                series_id,
                observations: series.len(),
            };
        }

        let written = self
            .analyze(series)
            .and_then(|(model, p_value, artifacts)| {
                layout
                    .write_series(&series_id, &artifacts)
                    .map(|files| (model, p_value, files))
            });

        match written {
            Ok((model, p_value, files)) => {
                info!(series = %series_id, %model, p_value, files = files.len(), "series analysed");
                SeriesOutcome::Completed {
                    series_id,
                    model,
                    p_value,
                    files,
                }
            }
            Err(e) => {
                warn!(series = %series_id, error = %e, "series failed");
                SeriesOutcome::Failed {
                    series_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Render every artifact of a series in memory
    fn analyze(&self, series: &Series) -> Result<(ModelKind, f64, SeriesArtifacts)> {
        let decomposition = self.decomposer.decompose(series)?;
        let decomposition_chart = self.charts.render_decomposition(series.id(), &decomposition)?;

        let forecasted = UntestedSeries::new(series)
            .test(&self.tester)?
            .forecast(&self.selector)?;
        let forecast_chart =
            self.charts
                .render_forecast(series, &forecasted.model, &forecasted.forecast)?;

        let report = Report::new(series.id(), &forecasted.stationarity, &forecasted.forecast);
        let artifacts = SeriesArtifacts {
            decomposition_chart,
            forecast_chart,
            report: self.reports.render(&report),
        };
        Ok((
            forecasted.forecast.model(),
            forecasted.stationarity.p_value,
            artifacts,
        ))
    }
}
