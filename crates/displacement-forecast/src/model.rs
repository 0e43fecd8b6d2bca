//! Closed set of forecasting models

use crate::bayesian::{BayesianAdditive, BayesianParams};
use crate::sarima::{SarimaParams, SeasonalArima};
use crate::traits::{Forecaster, ForecasterProperties};
use crate::types::{ForecastResult, ModelKind};
use displacement_core::{Result, Series};

/// One of the two forecasting models, dispatched statically
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastModel {
    SeasonalArima(SarimaParams),
    BayesianAdditive(BayesianParams),
}

impl ForecastModel {
    /// Title used on forecast charts
    pub fn describe(&self) -> String {
        match self {
            Self::SeasonalArima(params) => format!("Pronóstico {}", params.describe()),
            Self::BayesianAdditive(_) => "Pronóstico Bayesiano aditivo".to_string(),
        }
    }
}

impl ForecasterProperties for ForecastModel {
    fn kind(&self) -> ModelKind {
        match self {
            Self::SeasonalArima(_) => ModelKind::SeasonalArima,
            Self::BayesianAdditive(_) => ModelKind::BayesianAdditive,
        }
    }

    fn minimum_samples(&self) -> usize {
        match self {
            Self::SeasonalArima(params) => SeasonalArima::new(*params).minimum_samples(),
            Self::BayesianAdditive(params) => BayesianAdditive::new(*params).minimum_samples(),
        }
    }
}

impl Forecaster for ForecastModel {
    fn forecast(&self, series: &Series, horizon: usize) -> Result<ForecastResult> {
        match self {
            Self::SeasonalArima(params) => SeasonalArima::new(*params).forecast(series, horizon),
            Self::BayesianAdditive(params) => {
                BayesianAdditive::new(*params).forecast(series, horizon)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            ForecastModel::SeasonalArima(SarimaParams::default()).kind(),
            ModelKind::SeasonalArima
        );
        assert_eq!(
            ForecastModel::BayesianAdditive(BayesianParams::default()).kind(),
            ModelKind::BayesianAdditive
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            ForecastModel::SeasonalArima(SarimaParams::default()).describe(),
            "Pronóstico SARIMA (p,d,q)=(1,1,1)"
        );
        assert_eq!(
            ForecastModel::BayesianAdditive(BayesianParams::default()).describe(),
            "Pronóstico Bayesiano aditivo"
        );
    }
}
