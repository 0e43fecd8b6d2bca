//! Forecast result types

use chrono::NaiveDate;
use displacement_core::{Error, Result};
use std::fmt;

/// Which model produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Seasonal ARIMA, used for stationary series
    SeasonalArima,
    /// Bayesian additive trend + seasonality model, used for non-stationary series
    BayesianAdditive,
}

impl ModelKind {
    /// Label shown in the analysis report
    pub fn label(&self) -> &'static str {
        match self {
            Self::SeasonalArima => "SARIMA",
            Self::BayesianAdditive => "Bayesiano aditivo",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One forecast step with its 95% interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecast produced by a single model
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    model: ModelKind,
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Build a result, rejecting empty, non-finite or unordered forecasts
    pub fn new(model: ModelKind, points: Vec<ForecastPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::ModelFit(format!("{model} produced no forecast points")));
        }
        if points
            .iter()
            .any(|p| !(p.estimate.is_finite() && p.lower.is_finite() && p.upper.is_finite()))
        {
            return Err(Error::ModelFit(format!("{model} produced a non-finite forecast")));
        }
        if points.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(Error::ModelFit(format!(
                "{model} forecast timestamps are not strictly increasing"
            )));
        }
        Ok(Self { model, points })
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn estimates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.estimate).collect()
    }

    /// Largest of all point estimates and upper bounds
    pub fn max_forecast_value(&self) -> f64 {
        self.points
            .iter()
            .flat_map(|p| [p.estimate, p.upper])
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, estimate: f64, lower: f64, upper: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            estimate,
            lower,
            upper,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ModelKind::SeasonalArima.label(), "SARIMA");
        assert_eq!(ModelKind::BayesianAdditive.to_string(), "Bayesiano aditivo");
    }

    #[test]
    fn test_max_forecast_value_uses_upper_bound() {
        let result = ForecastResult::new(
            ModelKind::SeasonalArima,
            vec![point(1, 1.0, 0.0, 2.0), point(2, 3.0, 2.5, 3.5), point(3, 2.0, 1.0, 4.0)],
        )
        .unwrap();
        assert_eq!(result.max_forecast_value(), 4.0);
        assert_eq!(result.horizon(), 3);
    }

    #[test]
    fn test_max_forecast_value_when_estimate_exceeds_upper() {
        // A malformed interval still reports the largest estimate
        let result =
            ForecastResult::new(ModelKind::BayesianAdditive, vec![point(1, 5.0, 0.0, 1.0)]).unwrap();
        assert_eq!(result.max_forecast_value(), 5.0);
    }

    #[test]
    fn test_rejects_invalid_points() {
        assert!(matches!(
            ForecastResult::new(ModelKind::SeasonalArima, Vec::new()),
            Err(Error::ModelFit(_))
        ));
        assert!(matches!(
            ForecastResult::new(ModelKind::SeasonalArima, vec![point(1, f64::NAN, 0.0, 1.0)]),
            Err(Error::ModelFit(_))
        ));
        assert!(matches!(
            ForecastResult::new(
                ModelKind::SeasonalArima,
                vec![point(2, 1.0, 0.0, 2.0), point(1, 1.0, 0.0, 2.0)]
            ),
            Err(Error::ModelFit(_))
        ));
    }
}
