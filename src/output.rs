//! Output tree of one monitored structure
//!
//! ```text
//! <root>/<structure>/plots/decomposition_<id>.svg
//! <root>/<structure>/plots/forecast_<id>.svg
//! <root>/<structure>/reports/analysis_<id>.svg
//! ```

use displacement_core::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Documents rendered for one series, written together
#[derive(Debug, Clone, Default)]
pub struct SeriesArtifacts {
    pub decomposition_chart: Option<String>,
    pub forecast_chart: Option<String>,
    pub report: String,
}

#[derive(Debug, Clone)]
pub struct OutputLayout {
    plots_dir: PathBuf,
    reports_dir: PathBuf,
}

impl OutputLayout {
    /// Create the plot and report directories of a structure
    pub fn create(root: &Path, structure: &str) -> Result<Self> {
        let base = root.join(structure);
        let layout = Self {
            plots_dir: base.join("plots"),
            reports_dir: base.join("reports"),
        };
        fs::create_dir_all(&layout.plots_dir)?;
        fs::create_dir_all(&layout.reports_dir)?;
        debug!(path = %base.display(), "output directories ready");
        Ok(layout)
    }

    pub fn plots_dir(&self) -> &Path {
        &self.plots_dir
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn decomposition_path(&self, series_id: &str) -> PathBuf {
        self.plots_dir.join(format!("decomposition_{series_id}.svg"))
    }

    pub fn forecast_path(&self, series_id: &str) -> PathBuf {
        self.plots_dir.join(format!("forecast_{series_id}.svg"))
    }

    pub fn report_path(&self, series_id: &str) -> PathBuf {
        self.reports_dir.join(format!("analysis_{series_id}.svg"))
    }

    /// Write every artifact of a series
    ///
    /// Either all files are written or none remain: on failure the files
    /// already written for this series are removed again.
    pub fn write_series(&self, series_id: &str, artifacts: &SeriesArtifacts) -> Result<Vec<PathBuf>> {
        let mut pending: Vec<(PathBuf, &str)> = Vec::with_capacity(3);
        if let Some(chart) = &artifacts.decomposition_chart {
            pending.push((self.decomposition_path(series_id), chart.as_str()));
        }
        if let Some(chart) = &artifacts.forecast_chart {
            pending.push((self.forecast_path(series_id), chart.as_str()));
        }
        pending.push((self.report_path(series_id), artifacts.report.as_str()));

        let mut written: Vec<PathBuf> = Vec::with_capacity(pending.len());
        for (path, contents) in pending {
            if let Err(e) = fs::write(&path, contents) {
                for done in &written {
                    if let Err(cleanup) = fs::remove_file(done) {
                        warn!(path = %done.display(), error = %cleanup, "could not remove partial output");
                    }
                }
                return Err(e.into());
            }
            written.push(path);
        }
        Ok(written)
    }
}
