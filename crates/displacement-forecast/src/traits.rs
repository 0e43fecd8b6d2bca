//! Forecaster traits

use crate::types::{ForecastResult, ModelKind};
use displacement_core::{Result, Series};

/// Intrinsic properties of a forecasting model
pub trait ForecasterProperties {
    /// Model family
    fn kind(&self) -> ModelKind;

    /// Minimum number of observations the model can be fitted on
    fn minimum_samples(&self) -> usize;

    /// Check if the model can be fitted on the given sample size
    fn can_handle_size(&self, size: usize) -> bool {
        size >= self.minimum_samples()
    }
}

/// A model that fits a series and forecasts its next values
pub trait Forecaster: ForecasterProperties {
    /// Fit on `series` and forecast `horizon` steps with 95% intervals
    ///
    /// Fit failures (non-convergence, degenerate input, non-finite output)
    /// are reported as [`displacement_core::Error::ModelFit`].
    fn forecast(&self, series: &Series, horizon: usize) -> Result<ForecastResult>;
}
