//! Augmented Dickey-Fuller test with a constant
//!
//! The regression is
//!
//! ```text
//! Δx_t = c + γ·x_{t-1} + Σ_{i=1..p} φ_i·Δx_{t-i} + ε_t
//! ```
//!
//! and the statistic is the t-value of `γ`. The lag order `p` is chosen by
//! minimising AIC over `0..=maxlag`, with every candidate fitted on the same
//! sample so the criteria are comparable; the winner is then refitted on all
//! the rows its lag order allows.

use crate::mackinnon;
use crate::traits::{StationarityTest, StationarityTestProperties};
use crate::types::StationarityResult;
use displacement_core::{ols, Error, OlsFit, Result};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Augmented Dickey-Fuller unit-root test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdfTest {
    max_lag: Option<usize>,
}

impl AdfTest {
    /// Test with the Schwert rule for the maximum lag
    pub fn new() -> Self {
        Self::default()
    }

    /// Search lags `0..=max_lag` instead of the Schwert default
    pub fn with_max_lag(max_lag: usize) -> Self {
        Self {
            max_lag: Some(max_lag),
        }
    }

    /// Largest lag order the sample supports
    fn feasible_max_lag(n: usize) -> Option<usize> {
        (n / 2).checked_sub(2)
    }

    /// `ceil(12·(n/100)^{1/4})`, capped by the sample size
    pub fn schwert_max_lag(n: usize) -> Option<usize> {
        let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
        Self::feasible_max_lag(n).map(|feasible| schwert.min(feasible))
    }

    fn resolve_max_lag(&self, n: usize) -> Result<usize> {
        let feasible = Self::feasible_max_lag(n).ok_or(Error::InsufficientData {
            expected: self.minimum_samples(),
            actual: n,
        })?;
        match self.max_lag {
            None => Ok(Self::schwert_max_lag(n).unwrap_or(0)),
            Some(lag) if lag <= feasible => Ok(lag),
            Some(lag) => Err(Error::InvalidParameter(format!(
                "maximum lag {lag} exceeds {feasible} for {n} observations"
            ))),
        }
    }
}

impl StationarityTestProperties for AdfTest {
    fn minimum_samples(&self) -> usize {
        4
    }

    fn method_name(&self) -> &str {
        "Augmented Dickey-Fuller"
    }
}

impl StationarityTest for AdfTest {
    fn analyze(&self, values: &[f64]) -> Result<StationarityResult> {
        let n = values.len();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("stationarity test input"));
        }
        let max_lag = self.resolve_max_lag(n)?;

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if min == max {
            return Err(Error::Computation("series is constant".to_string()));
        }

        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let m = diffs.len();

        // Lag search on the common sample
        let common = m - max_lag;
        let mut best: Option<(f64, usize)> = None;
        for lag in 0..=max_lag {
            let fit = fit_regression(values, &diffs, lag, common)?;
            let aic = fit.aic();
            debug!(lag, aic, "candidate lag");
            // Strict comparison keeps the smaller lag on ties
            if best.map_or(true, |(best_aic, _)| aic < best_aic) {
                best = Some((aic, lag));
            }
        }
        let (ic_best, used_lag) = best.ok_or_else(|| Error::Computation("no candidate lag".into()))?;

        let n_obs = m - used_lag;
        let fit = fit_regression(values, &diffs, used_lag, n_obs)?;
        let statistic = fit.t_values()[1];
        if !statistic.is_finite() {
            return Err(Error::Computation(
                "unit-root regression has a degenerate level coefficient".to_string(),
            ));
        }

        let p_value = mackinnon::p_value(statistic);
        debug!(statistic, p_value, used_lag, n_obs, "dickey-fuller regression fitted");

        Ok(StationarityResult {
            statistic,
            p_value,
            used_lag,
            n_obs,
            critical_values: mackinnon::critical_values(n_obs),
            ic_best: Some(ic_best),
        })
    }
}

/// Fit the ADF regression with `lag` lagged differences on the last `rows`
/// differences
///
/// Columns: constant, lagged level, then `Δx_{t-1} .. Δx_{t-lag}`.
fn fit_regression(levels: &[f64], diffs: &[f64], lag: usize, rows: usize) -> Result<OlsFit> {
    let m = diffs.len();
    let start = m - rows;
    let design = DMatrix::from_fn(rows, lag + 2, |r, c| {
        let t = start + r;
        match c {
            0 => 1.0,
            1 => levels[t],
            i => diffs[t - (i - 1)],
        }
    });
    let response = DVector::from_iterator(rows, diffs[start..].iter().copied());
    ols(&design, &response)
}
