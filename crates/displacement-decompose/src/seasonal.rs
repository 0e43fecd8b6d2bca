//! Classical additive decomposition with a centered moving-average trend

use chrono::NaiveDate;
use displacement_core::constants::DECOMPOSITION_PERIOD;
use displacement_core::{Error, Result, Series};
use tracing::debug;

/// Components of an additive decomposition
///
/// `observed[i] == trend[i] + seasonal[i] + residual[i]` wherever the trend
/// is defined. Trend and residual are `None` for the first and last
/// `period / 2` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub timestamps: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
    /// Period the decomposition was computed with
    pub period: usize,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

/// Additive decomposer for a fixed seasonal period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalDecomposer {
    period: usize,
}

impl Default for SeasonalDecomposer {
    fn default() -> Self {
        Self {
            period: DECOMPOSITION_PERIOD,
        }
    }
}

impl SeasonalDecomposer {
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(Error::InvalidParameter(format!(
                "decomposition period must be at least 2, got {period}"
            )));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Minimum number of points: two full cycles
    pub fn minimum_samples(&self) -> usize {
        2 * self.period
    }

    /// Decompose a series
    pub fn decompose(&self, series: &Series) -> Result<Decomposition> {
        let mut decomposition = self.decompose_values(&series.values())?;
        decomposition.timestamps = series.timestamps();
        debug!(series = series.id(), period = self.period, "decomposed series");
        Ok(decomposition)
    }

    /// Decompose raw values; the returned timestamps are empty
    pub fn decompose_values(&self, values: &[f64]) -> Result<Decomposition> {
        let n = values.len();
        if n < self.minimum_samples() {
            return Err(Error::InsufficientData {
                expected: self.minimum_samples(),
                actual: n,
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("decomposition input"));
        }

        let trend = self.centered_moving_average(values);

        // Per-phase mean of the detrended values
        let mut sums = vec![0.0; self.period];
        let mut counts = vec![0usize; self.period];
        for (i, (value, t)) in values.iter().zip(&trend).enumerate() {
            if let Some(t) = t {
                sums[i % self.period] += value - t;
                counts[i % self.period] += 1;
            }
        }
        let mut phase_means: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
            .collect();
        let overall = phase_means.iter().sum::<f64>() / self.period as f64;
        for m in &mut phase_means {
            *m -= overall;
        }

        let seasonal: Vec<f64> = (0..n).map(|i| phase_means[i % self.period]).collect();
        let residual = values
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((v, t), s)| t.map(|t| v - t - s))
            .collect();

        Ok(Decomposition {
            timestamps: Vec::new(),
            observed: values.to_vec(),
            trend,
            seasonal,
            residual,
            period: self.period,
        })
    }

    /// Centered moving average; a 2×period average for even periods
    fn centered_moving_average(&self, values: &[f64]) -> Vec<Option<f64>> {
        let weights = self.filter_weights();
        let half = weights.len() / 2;
        let n = values.len();

        (0..n)
            .map(|i| {
                if i < half || i + half >= n {
                    return None;
                }
                let window = &values[i - half..=i + half];
                Some(window.iter().zip(&weights).map(|(v, w)| v * w).sum())
            })
            .collect()
    }

    fn filter_weights(&self) -> Vec<f64> {
        let p = self.period as f64;
        if self.period % 2 == 0 {
            let mut weights = vec![1.0 / p; self.period + 1];
            weights[0] = 0.5 / p;
            weights[self.period] = 0.5 / p;
            weights
        } else {
            vec![1.0 / p; self.period]
        }
    }
}
