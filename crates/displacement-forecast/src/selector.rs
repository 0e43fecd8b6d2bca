//! Stationarity-driven model selection
//!
//! A series moves through `Untested → {Stationary, NonStationary} →
//! Forecasted`. Each transition consumes the previous state, so a series can
//! be tested once and forecast once, and only by the model its test result
//! selects.

use crate::bayesian::BayesianParams;
use crate::model::ForecastModel;
use crate::sarima::SarimaParams;
use crate::traits::Forecaster;
use crate::types::ForecastResult;
use displacement_core::constants::FORECAST_HORIZON;
use displacement_core::{Result, Series};
use displacement_stationarity::{Stationarity, StationarityResult, StationarityTest};
use tracing::debug;

/// Maps a stationarity outcome to a forecasting model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelector {
    sarima: SarimaParams,
    bayesian: BayesianParams,
    horizon: usize,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            sarima: SarimaParams::default(),
            bayesian: BayesianParams::default(),
            horizon: FORECAST_HORIZON,
        }
    }
}

impl ModelSelector {
    pub fn new(sarima: SarimaParams, bayesian: BayesianParams) -> Self {
        Self {
            sarima,
            bayesian,
            ..Self::default()
        }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Seasonal ARIMA for stationary series, Bayesian additive otherwise
    pub fn select(&self, stationarity: Stationarity) -> ForecastModel {
        match stationarity {
            Stationarity::Stationary => ForecastModel::SeasonalArima(self.sarima),
            Stationarity::NonStationary => ForecastModel::BayesianAdditive(self.bayesian),
        }
    }
}

/// A series that has not been tested yet
#[derive(Debug, Clone, Copy)]
pub struct UntestedSeries<'a> {
    series: &'a Series,
}

impl<'a> UntestedSeries<'a> {
    pub fn new(series: &'a Series) -> Self {
        Self { series }
    }

    pub fn series(&self) -> &'a Series {
        self.series
    }

    /// Run the stationarity test and classify the series
    pub fn test<T: StationarityTest>(self, tester: &T) -> Result<TestedSeries<'a>> {
        let result = tester.analyze_series(self.series)?;
        debug!(
            series = self.series.id(),
            p_value = result.p_value,
            stationary = result.is_stationary(),
            "stationarity tested"
        );
        Ok(match result.stationarity() {
            Stationarity::Stationary => TestedSeries::Stationary {
                series: self.series,
                result,
            },
            Stationarity::NonStationary => TestedSeries::NonStationary {
                series: self.series,
                result,
            },
        })
    }
}

/// A tested series, classified by its test result
#[derive(Debug, Clone)]
pub enum TestedSeries<'a> {
    Stationary {
        series: &'a Series,
        result: StationarityResult,
    },
    NonStationary {
        series: &'a Series,
        result: StationarityResult,
    },
}

impl<'a> TestedSeries<'a> {
    pub fn series(&self) -> &'a Series {
        match self {
            Self::Stationary { series, .. } | Self::NonStationary { series, .. } => series,
        }
    }

    pub fn stationarity_result(&self) -> &StationarityResult {
        match self {
            Self::Stationary { result, .. } | Self::NonStationary { result, .. } => result,
        }
    }

    pub fn stationarity(&self) -> Stationarity {
        match self {
            Self::Stationary { .. } => Stationarity::Stationary,
            Self::NonStationary { .. } => Stationarity::NonStationary,
        }
    }

    /// Forecast with the model selected for this state
    pub fn forecast(self, selector: &ModelSelector) -> Result<ForecastedSeries<'a>> {
        let model = selector.select(self.stationarity());
        let series = self.series();
        let forecast = model.forecast(series, selector.horizon())?;
        let stationarity = match self {
            Self::Stationary { result, .. } | Self::NonStationary { result, .. } => result,
        };
        Ok(ForecastedSeries {
            series,
            model,
            stationarity,
            forecast,
        })
    }
}

/// Terminal state: a tested and forecast series
#[derive(Debug, Clone)]
pub struct ForecastedSeries<'a> {
    pub series: &'a Series,
    pub model: ForecastModel,
    pub stationarity: StationarityResult,
    pub forecast: ForecastResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelKind;
    use crate::ForecasterProperties;

    #[test]
    fn test_select_by_stationarity() {
        let selector = ModelSelector::default();
        assert_eq!(
            selector.select(Stationarity::Stationary).kind(),
            ModelKind::SeasonalArima
        );
        assert_eq!(
            selector.select(Stationarity::NonStationary).kind(),
            ModelKind::BayesianAdditive
        );
        assert_eq!(selector.horizon(), 6);
    }
}
