//! Result types of a stationarity test

use displacement_core::constants::STATIONARITY_SIGNIFICANCE;
use std::fmt;

/// Confidence levels with tabulated critical values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceLevel {
    OnePercent,
    FivePercent,
    TenPercent,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 3] = [Self::OnePercent, Self::FivePercent, Self::TenPercent];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnePercent => "1%",
            Self::FivePercent => "5%",
            Self::TenPercent => "10%",
        }
    }

    pub fn significance(&self) -> f64 {
        match self {
            Self::OnePercent => 0.01,
            Self::FivePercent => 0.05,
            Self::TenPercent => 0.10,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Critical values of the test statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

impl CriticalValues {
    pub fn get(&self, level: ConfidenceLevel) -> f64 {
        match level {
            ConfidenceLevel::OnePercent => self.one_percent,
            ConfidenceLevel::FivePercent => self.five_percent,
            ConfidenceLevel::TenPercent => self.ten_percent,
        }
    }

    /// Values ordered 1%, 5%, 10%
    pub fn iter(&self) -> impl Iterator<Item = (ConfidenceLevel, f64)> + '_ {
        ConfidenceLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }
}

/// Outcome of the stationarity branch decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stationarity {
    Stationary,
    NonStationary,
}

impl Stationarity {
    /// Classify a p-value against the fixed significance level
    ///
    /// NaN is never below the threshold and classifies as non-stationary.
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < STATIONARITY_SIGNIFICANCE {
            Self::Stationary
        } else {
            Self::NonStationary
        }
    }

    pub fn is_stationary(&self) -> bool {
        matches!(self, Self::Stationary)
    }
}

/// Value of a reported metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A count, rendered without a decimal point
    Count(usize),
    /// A real number, rendered with fixed decimals
    Real(f64),
}

/// A named metric as it appears in the analysis report
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn count(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Count(value),
        }
    }

    pub fn real(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Real(value),
        }
    }
}

/// Result of a unit-root test
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// Approximate p-value of the statistic
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Number of observations in the final regression
    pub n_obs: usize,
    /// Critical values for the observation count
    pub critical_values: CriticalValues,
    /// Information criterion of the selected lag, when lags were searched
    pub ic_best: Option<f64>,
}

impl StationarityResult {
    pub fn stationarity(&self) -> Stationarity {
        Stationarity::from_p_value(self.p_value)
    }

    /// Whether `p_value < 0.05`
    pub fn is_stationary(&self) -> bool {
        self.stationarity().is_stationary()
    }

    /// Metrics in report order
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![
            Metric::real("Test Statistic", self.statistic),
            Metric::real("p-value", self.p_value),
            Metric::count("No. of Lags used", self.used_lag),
            Metric::count("Number of observations used", self.n_obs),
        ];
        metrics.extend(
            self.critical_values
                .iter()
                .map(|(level, value)| Metric::real(format!("Critical Value ({level})"), value)),
        );
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_p(p_value: f64) -> StationarityResult {
        StationarityResult {
            statistic: -2.0,
            p_value,
            used_lag: 1,
            n_obs: 22,
            critical_values: CriticalValues {
                one_percent: -3.75,
                five_percent: -3.0,
                ten_percent: -2.63,
            },
            ic_best: None,
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(result_with_p(0.0499).is_stationary());
        assert!(!result_with_p(0.05).is_stationary());
        assert!(!result_with_p(0.20).is_stationary());
        assert_eq!(Stationarity::from_p_value(f64::NAN), Stationarity::NonStationary);
    }

    #[test]
    fn test_metrics_order_and_kinds() {
        let metrics = result_with_p(0.2).metrics();
        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Test Statistic",
                "p-value",
                "No. of Lags used",
                "Number of observations used",
                "Critical Value (1%)",
                "Critical Value (5%)",
                "Critical Value (10%)",
            ]
        );
        assert_eq!(metrics[2].value, MetricValue::Count(1));
        assert_eq!(metrics[3].value, MetricValue::Count(22));
        assert_eq!(metrics[4].value, MetricValue::Real(-3.75));
    }

    #[test]
    fn test_critical_values_iterate_in_order() {
        let levels: Vec<&str> = result_with_p(0.2)
            .critical_values
            .iter()
            .map(|(level, _)| level.label())
            .collect();
        assert_eq!(levels, vec!["1%", "5%", "10%"]);
    }
}
