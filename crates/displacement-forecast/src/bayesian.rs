//! Bayesian additive forecaster
//!
//! Piecewise-linear trend with automatically placed changepoints plus a
//! yearly Fourier seasonality, fitted at the posterior mode:
//!
//! ```text
//! y(t) = (k + a(t)ᵀδ)·t + (m − a(t)ᵀ(s∘δ)) + Σ β_j·f_j(t) + ε
//! k, m ~ N(0, 5²)    δ_j ~ Laplace(0, τ)    β_j ~ N(0, 10²)
//! ```
//!
//! Time is scaled to [0, 1] over the history and values by their largest
//! magnitude. The Laplace prior is handled by iteratively reweighted ridge
//! regression (each step majorises `|δ|` by a quadratic at the previous
//! estimate); the noise variance is re-estimated from the residuals with the
//! effective degrees of freedom of the penalised fit.

use crate::traits::{Forecaster, ForecasterProperties};
use crate::types::{ForecastPoint, ForecastResult, ModelKind};
use chrono::NaiveDate;
use displacement_core::calendar::{days_since_epoch, month_ends_after};
use displacement_core::constants::{CHANGEPOINT_PRIOR_SCALE, INTERVAL_COVERAGE};
use displacement_core::numeric::two_sided_z;
use displacement_core::{symmetric_inverse, Error, Result, Series};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// Smallest `|δ|` used when reweighting the Laplace penalty
const DELTA_FLOOR: f64 = 1e-6;
/// Smallest noise variance on the scaled data
const SIGMA2_FLOOR: f64 = 1e-6;

/// Hyperparameters of the Bayesian additive model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BayesianParams {
    /// Upper bound on the number of trend changepoints
    pub n_changepoints: usize,
    /// Share of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Scale of the Laplace prior on trend changes
    pub changepoint_prior_scale: f64,
    /// Standard deviation of the Normal prior on seasonal coefficients
    pub seasonality_prior_scale: f64,
    /// Standard deviation of the Normal prior on base growth and offset
    pub trend_prior_scale: f64,
    /// Period of the yearly seasonality in days
    pub yearly_period: f64,
    /// Number of Fourier pairs of the yearly seasonality
    pub yearly_order: usize,
    pub max_iterations: usize,
    /// Convergence tolerance on the per-step change of the fitted values,
    /// relative to the noise standard deviation, and of the noise variance,
    /// relative to itself
    pub tolerance: f64,
}

impl Default for BayesianParams {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: CHANGEPOINT_PRIOR_SCALE,
            seasonality_prior_scale: 10.0,
            trend_prior_scale: 5.0,
            yearly_period: 365.25,
            yearly_order: 10,
            max_iterations: 5_000,
            tolerance: 1e-4,
        }
    }
}

impl BayesianParams {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.changepoint_range) {
            return Err(Error::InvalidParameter(format!(
                "changepoint range must lie in [0, 1], got {}",
                self.changepoint_range
            )));
        }
        for (name, value) in [
            ("changepoint prior scale", self.changepoint_prior_scale),
            ("seasonality prior scale", self.seasonality_prior_scale),
            ("trend prior scale", self.trend_prior_scale),
            ("yearly period", self.yearly_period),
        ] {
            if !(value > 0.0) {
                return Err(Error::InvalidParameter(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

/// Posterior-mode fit of the additive model
#[derive(Debug, Clone)]
pub struct BayesianFit {
    /// First observed day (days since epoch)
    pub origin: f64,
    /// Length of the history in days
    pub span: f64,
    /// Divisor applied to the observed values
    pub y_scale: f64,
    /// Changepoint locations on the scaled time axis
    pub changepoints: Vec<f64>,
    /// Base growth rate (scaled units)
    pub growth: f64,
    /// Offset (scaled units)
    pub offset: f64,
    /// Rate changes at each changepoint (scaled units)
    pub deltas: Vec<f64>,
    /// Fourier coefficients, `sin` and `cos` interleaved by order
    pub seasonal: Vec<f64>,
    /// Noise variance on the scaled data
    pub sigma2: f64,
    pub iterations: usize,
}

impl BayesianFit {
    /// Scaled time of a date
    pub fn scaled_time(&self, date: NaiveDate) -> f64 {
        (days_since_epoch(date) - self.origin) / self.span
    }
}

/// Bayesian additive forecaster
#[derive(Debug, Clone, Default)]
pub struct BayesianAdditive {
    params: BayesianParams,
}

impl BayesianAdditive {
    pub fn new(params: BayesianParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BayesianParams {
        &self.params
    }

    /// Fit the model at its posterior mode
    pub fn fit(&self, series: &Series) -> Result<BayesianFit> {
        self.params.validate()?;
        series.require_len(self.minimum_samples())?;

        let days: Vec<f64> = series.timestamps().into_iter().map(days_since_epoch).collect();
        let values = series.values();
        let n = values.len();

        let origin = days[0];
        let span = days[n - 1] - origin;
        if span <= 0.0 {
            return Err(Error::ModelFit("history spans zero days".to_string()));
        }
        let t: Vec<f64> = days.iter().map(|d| (d - origin) / span).collect();

        let y_max = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        let y_scale = if y_max > 0.0 { y_max } else { 1.0 };
        let y = DVector::from_iterator(n, values.iter().map(|v| v / y_scale));

        let changepoints = self.place_changepoints(&t);
        let n_cp = changepoints.len();

        let rows: Vec<Vec<f64>> = t
            .iter()
            .zip(&days)
            .map(|(&ti, &di)| self.design_row(ti, di, &changepoints))
            .collect();
        let n_cols = rows[0].len();
        let x = DMatrix::from_fn(n, n_cols, |r, c| rows[r][c]);
        let xt = x.transpose();
        let xtx = &xt * &x;
        let xty = &xt * &y;

        let trend_precision = self.params.trend_prior_scale.powi(-2);
        let seasonal_precision = self.params.seasonality_prior_scale.powi(-2);
        let b = self.params.changepoint_prior_scale;

        let mean = y.mean();
        let mut sigma2 = (y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).max(1e-4);
        let mut deltas = vec![b; n_cp];
        let mut previous_fit: Option<DVector<f64>> = None;

        for iteration in 0..self.params.max_iterations {
            let mut a = xtx.clone();
            for i in 0..n_cols {
                let precision = match i {
                    0 | 1 => trend_precision,
                    i if i < 2 + n_cp => 1.0 / (b * deltas[i - 2].abs().max(DELTA_FLOOR)),
                    _ => seasonal_precision,
                };
                a[(i, i)] += sigma2 * precision;
            }

            let a_inv = symmetric_inverse(a)
                .map_err(|e| Error::ModelFit(format!("Bayesian additive model: {e}")))?;
            let theta = &a_inv * &xty;
            let fitted = &x * &theta;
            let ssr = (&y - &fitted).norm_squared();
            let effective_df = (&a_inv * &xtx).trace();
            let next_sigma2 = (ssr / (n as f64 - effective_df).max(1.0)).max(SIGMA2_FLOOR);

            if theta.iter().any(|v| !v.is_finite()) || !next_sigma2.is_finite() {
                return Err(Error::ModelFit(
                    "Bayesian additive model produced non-finite coefficients".to_string(),
                ));
            }

            // Step size is judged against the noise level
            let converged = previous_fit.as_ref().is_some_and(|prev| {
                (&fitted - prev).amax() <= self.params.tolerance * next_sigma2.sqrt()
                    && (next_sigma2 - sigma2).abs() <= self.params.tolerance * next_sigma2
            });

            sigma2 = next_sigma2;
            deltas = theta.rows(2, n_cp).iter().copied().collect();

            if converged {
                debug!(iterations = iteration, sigma2, effective_df, "Bayesian additive model fitted");
                return Ok(BayesianFit {
                    origin,
                    span,
                    y_scale,
                    changepoints,
                    growth: theta[0],
                    offset: theta[1],
                    deltas,
                    seasonal: theta.rows(2 + n_cp, n_cols - 2 - n_cp).iter().copied().collect(),
                    sigma2,
                    iterations: iteration,
                });
            }
            previous_fit = Some(fitted);
        }

        Err(Error::not_converged("Bayesian additive model", self.params.max_iterations))
    }

    /// Point forecast and standard error on the original scale
    pub fn predict(&self, fit: &BayesianFit, date: NaiveDate) -> (f64, f64) {
        let t = fit.scaled_time(date);
        let row = self.design_row(t, days_since_epoch(date), &fit.changepoints);
        let coefficients = [fit.growth, fit.offset]
            .into_iter()
            .chain(fit.deltas.iter().copied())
            .chain(fit.seasonal.iter().copied());
        let estimate: f64 = row.iter().zip(coefficients).map(|(x, c)| x * c).sum();

        // Future changepoints arrive at the historical rate with Laplace
        // magnitudes of the historical mean size
        let trend_variance = if fit.changepoints.is_empty() || t <= 1.0 {
            0.0
        } else {
            let rate = fit.changepoints.len() as f64;
            let scale =
                fit.deltas.iter().map(|d| d.abs()).sum::<f64>() / fit.deltas.len() as f64 + 1e-8;
            rate * 2.0 * scale * scale * (t - 1.0).powi(3) / 3.0
        };
        let se = (fit.sigma2 + trend_variance).sqrt();

        (estimate * fit.y_scale, se * fit.y_scale)
    }

    /// Changepoints evenly spread over the first part of the history
    fn place_changepoints(&self, t: &[f64]) -> Vec<f64> {
        let hist_size = (t.len() as f64 * self.params.changepoint_range).floor() as usize;
        let n_cp = self.params.n_changepoints.min(hist_size.saturating_sub(1));
        if n_cp == 0 {
            return Vec::new();
        }
        let last = (hist_size - 1) as f64;
        (1..=n_cp)
            .map(|i| {
                let index = (i as f64 * last / n_cp as f64).round() as usize;
                t[index]
            })
            .collect()
    }

    /// `[t, 1, a_j(t)·(t − s_j)…, sin/cos Fourier terms…]`
    fn design_row(&self, t: f64, day: f64, changepoints: &[f64]) -> Vec<f64> {
        let mut row = Vec::with_capacity(2 + changepoints.len() + 2 * self.params.yearly_order);
        row.push(t);
        row.push(1.0);
        row.extend(changepoints.iter().map(|&s| if t >= s { t - s } else { 0.0 }));
        for k in 1..=self.params.yearly_order {
            let angle = 2.0 * PI * k as f64 * day / self.params.yearly_period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
        row
    }
}

impl ForecasterProperties for BayesianAdditive {
    fn kind(&self) -> ModelKind {
        ModelKind::BayesianAdditive
    }

    fn minimum_samples(&self) -> usize {
        2
    }
}

impl Forecaster for BayesianAdditive {
    #[instrument(skip(self, series), fields(series_id = series.id()))]
    fn forecast(&self, series: &Series, horizon: usize) -> Result<ForecastResult> {
        let fit = self.fit(series)?;
        let last = series
            .last_timestamp()
            .ok_or(Error::InsufficientData { expected: 2, actual: 0 })?;
        let z = two_sided_z(INTERVAL_COVERAGE);

        let points = month_ends_after(last, horizon)
            .into_iter()
            .map(|timestamp| {
                let (estimate, se) = self.predict(&fit, timestamp);
                ForecastPoint {
                    timestamp,
                    estimate,
                    lower: estimate - z * se,
                    upper: estimate + z * se,
                }
            })
            .collect();
        ForecastResult::new(ModelKind::BayesianAdditive, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monthly_series(id: &str, values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        let timestamps = month_ends_after(start, values.len());
        Series::from_parts(id, &timestamps, values).unwrap()
    }

    #[test]
    fn test_changepoint_placement() {
        let model = BayesianAdditive::default();
        let t: Vec<f64> = (0..24).map(|i| i as f64 / 23.0).collect();
        let cps = model.place_changepoints(&t);
        // floor(0.8 * 24) = 19 history points leave room for 18 changepoints
        assert_eq!(cps.len(), 18);
        assert!(cps.iter().all(|&s| s > 0.0 && s <= t[18]));
        assert!(cps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_changepoints_capped() {
        let model = BayesianAdditive::default();
        let t: Vec<f64> = (0..200).map(|i| i as f64 / 199.0).collect();
        assert_eq!(model.place_changepoints(&t).len(), 25);
        assert!(model.place_changepoints(&[0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_design_row_layout() {
        let model = BayesianAdditive::default();
        let row = model.design_row(0.5, 0.0, &[0.25, 0.75]);
        assert_eq!(row.len(), 2 + 2 + 20);
        assert_eq!(row[0], 0.5);
        assert_eq!(row[1], 1.0);
        assert_relative_eq!(row[2], 0.25);
        assert_eq!(row[3], 0.0);
        // sin(0) and cos(0)
        assert_eq!(row[4], 0.0);
        assert_eq!(row[5], 1.0);
    }

    #[test]
    fn test_linear_history_is_extended() {
        let values: Vec<f64> = (0..36).map(|i| 10.0 + 0.5 * i as f64).collect();
        let series = monthly_series("P_TOT", &values);
        let result = BayesianAdditive::default().forecast(&series, 6).unwrap();

        assert_eq!(result.horizon(), 6);
        let estimates = result.estimates();
        // The forecast keeps climbing beyond the last observation
        assert!(estimates[5] > values[35]);
        for point in result.points() {
            assert!(point.lower <= point.estimate && point.estimate <= point.upper);
        }
    }

    #[test]
    fn test_intervals_widen_with_horizon() {
        let values: Vec<f64> = (0..30)
            .map(|i| (i as f64 * 0.7).sin() + 0.1 * i as f64 + if i > 15 { 2.0 } else { 0.0 })
            .collect();
        let series = monthly_series("P_HOR", &values);
        let result = BayesianAdditive::default().forecast(&series, 6).unwrap();
        let widths: Vec<f64> = result.points().iter().map(|p| p.upper - p.lower).collect();
        assert!(widths.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    }

    #[test]
    fn test_constant_history() {
        let series = monthly_series("P_TOT", &[0.0; 20]);
        let result = BayesianAdditive::default().forecast(&series, 6).unwrap();
        for estimate in result.estimates() {
            assert!(estimate.abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_params() {
        let model = BayesianAdditive::new(BayesianParams {
            changepoint_range: 1.5,
            ..BayesianParams::default()
        });
        let series = monthly_series("P_TOT", &[1.0, 2.0, 3.0]);
        assert!(matches!(model.fit(&series), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_single_point_rejected() {
        let series = monthly_series("P_TOT", &[1.0]);
        assert!(matches!(
            BayesianAdditive::default().fit(&series),
            Err(Error::InsufficientData { .. })
        ));
    }
}
