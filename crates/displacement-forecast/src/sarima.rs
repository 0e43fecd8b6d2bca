//! Seasonal ARIMA forecaster
//!
//! The model for a series `y` is
//!
//! ```text
//! φ(B)·Φ(Bˢ)·(1−B)ᵈ·(1−Bˢ)ᴰ·y_t = θ(B)·Θ(Bˢ)·ε_t
//! ```
//!
//! without a constant. Coefficients are estimated by conditional sum of
//! squares on the differenced series with zero pre-sample values. Each
//! coefficient is mapped through `tanh` so the optimiser works on an
//! unconstrained space while every coefficient stays inside (−1, 1).

use crate::optimize::NelderMead;
use crate::traits::{Forecaster, ForecasterProperties};
use crate::types::{ForecastPoint, ForecastResult, ModelKind};
use displacement_core::calendar::month_ends_after;
use displacement_core::constants::{INTERVAL_COVERAGE, SARIMA_SEASONAL_PERIOD};
use displacement_core::numeric::two_sided_z;
use displacement_core::{Error, Result, Series};
use tracing::{debug, instrument};

/// Order of a seasonal ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaParams {
    /// Non-seasonal AR order
    pub p: usize,
    /// Non-seasonal differencing order
    pub d: usize,
    /// Non-seasonal MA order
    pub q: usize,
    /// Seasonal AR order
    pub seasonal_p: usize,
    /// Seasonal differencing order
    pub seasonal_d: usize,
    /// Seasonal MA order
    pub seasonal_q: usize,
    /// Season length in observations
    pub period: usize,
}

impl Default for SarimaParams {
    fn default() -> Self {
        Self {
            p: 1,
            d: 1,
            q: 1,
            seasonal_p: 1,
            seasonal_d: 1,
            seasonal_q: 1,
            period: SARIMA_SEASONAL_PERIOD,
        }
    }
}

impl SarimaParams {
    /// Number of estimated coefficients
    pub fn n_coefficients(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Observations consumed by differencing
    pub fn differencing_loss(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    /// Title used on forecast charts, e.g. `SARIMA (p,d,q)=(1,1,1)`
    pub fn describe(&self) -> String {
        format!("SARIMA (p,d,q)=({},{},{})", self.p, self.d, self.q)
    }

    fn validate(&self) -> Result<()> {
        if self.period < 2 && (self.seasonal_p + self.seasonal_d + self.seasonal_q) > 0 {
            return Err(Error::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.period
            )));
        }
        Ok(())
    }
}

/// Fitted seasonal ARIMA coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaFit {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
    /// Innovation variance
    pub sigma2: f64,
    /// Optimiser iterations used
    pub iterations: usize,
}

/// Weight of the quadratic penalty on the unconstrained coefficients
const RIDGE: f64 = 1e-4;

/// Seasonal ARIMA forecaster
#[derive(Debug, Clone, Default)]
pub struct SeasonalArima {
    params: SarimaParams,
    optimizer: NelderMead,
}

impl SeasonalArima {
    pub fn new(params: SarimaParams) -> Self {
        Self {
            params,
            optimizer: NelderMead::default(),
        }
    }

    pub fn with_optimizer(mut self, optimizer: NelderMead) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn params(&self) -> &SarimaParams {
        &self.params
    }

    /// Estimate coefficients by conditional sum of squares
    pub fn fit(&self, values: &[f64]) -> Result<SarimaFit> {
        self.params.validate()?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("SARIMA input"));
        }

        let differenced = apply_polynomial(&self.difference_polynomial(), values);
        let n_coef = self.params.n_coefficients();
        if differenced.len() < n_coef + 1 {
            return Err(Error::ModelFit(format!(
                "SARIMA needs at least {} differenced observations, got {}",
                n_coef + 1,
                differenced.len()
            )));
        }

        let mean_square =
            differenced.iter().map(|w| w * w).sum::<f64>() / differenced.len() as f64;
        let scale = if mean_square > 0.0 { mean_square } else { 1.0 };
        let n_w = differenced.len() as f64;

        let objective = |u: &[f64]| {
            let coefficients: Vec<f64> = u.iter().map(|v| v.tanh()).collect();
            let (ar_poly, ma_poly) = self.arma_polynomials(&coefficients);
            let ssr: f64 = css_residuals(&ar_poly, &ma_poly, &differenced)
                .iter()
                .map(|e| e * e)
                .sum();
            ssr / n_w / scale + RIDGE * u.iter().map(|v| v * v).sum::<f64>()
        };

        let start = vec![0.1; n_coef];
        let result = self.optimizer.minimize(objective, &start);
        if !result.converged {
            return Err(Error::not_converged("SARIMA", result.iterations));
        }

        let coefficients: Vec<f64> = result.solution.iter().map(|v| v.tanh()).collect();
        let (ar_poly, ma_poly) = self.arma_polynomials(&coefficients);
        let residuals = css_residuals(&ar_poly, &ma_poly, &differenced);
        let sigma2 = residuals.iter().map(|e| e * e).sum::<f64>() / n_w;
        if !sigma2.is_finite() {
            return Err(Error::ModelFit("SARIMA innovation variance is not finite".to_string()));
        }

        let (ar, rest) = coefficients.split_at(self.params.p);
        let (ma, rest) = rest.split_at(self.params.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(self.params.seasonal_p);

        debug!(iterations = result.iterations, sigma2, "SARIMA fitted");

        Ok(SarimaFit {
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ar: seasonal_ar.to_vec(),
            seasonal_ma: seasonal_ma.to_vec(),
            sigma2,
            iterations: result.iterations,
        })
    }

    /// Point forecasts and standard errors for `horizon` steps
    pub fn predict(&self, fit: &SarimaFit, values: &[f64], horizon: usize) -> Result<Vec<(f64, f64)>> {
        let diff_poly = self.difference_polynomial();
        let coefficients: Vec<f64> = fit
            .ar
            .iter()
            .chain(&fit.ma)
            .chain(&fit.seasonal_ar)
            .chain(&fit.seasonal_ma)
            .copied()
            .collect();
        let (ar_poly, ma_poly) = self.arma_polynomials(&coefficients);

        let mut w = apply_polynomial(&diff_poly, values);
        let mut e = css_residuals(&ar_poly, &ma_poly, &w);
        let mut y = values.to_vec();

        for _ in 0..horizon {
            let t = w.len();
            let mut next_w = 0.0;
            for (i, a) in ar_poly.iter().enumerate().skip(1) {
                if let Some(prev) = t.checked_sub(i).map(|k| w[k]) {
                    next_w -= a * prev;
                }
            }
            for (j, b) in ma_poly.iter().enumerate().skip(1) {
                if let Some(prev) = t.checked_sub(j).map(|k| e[k]) {
                    next_w += b * prev;
                }
            }
            w.push(next_w);
            e.push(0.0);

            // Undo the differencing
            let t = y.len();
            let mut next_y = next_w;
            for (i, c) in diff_poly.iter().enumerate().skip(1) {
                if let Some(prev) = t.checked_sub(i).map(|k| y[k]) {
                    next_y -= c * prev;
                }
            }
            y.push(next_y);
        }

        let psi = psi_weights(&multiply(&ar_poly, &diff_poly), &ma_poly, horizon);
        let mut cumulative = 0.0;
        let forecasts: Vec<(f64, f64)> = y[values.len()..]
            .iter()
            .zip(&psi)
            .map(|(&estimate, weight)| {
                cumulative += weight * weight;
                (estimate, (fit.sigma2 * cumulative).sqrt())
            })
            .collect();
        if forecasts.iter().any(|(estimate, se)| !(estimate.is_finite() && se.is_finite())) {
            return Err(Error::ModelFit("SARIMA forecast diverged".to_string()));
        }
        Ok(forecasts)
    }

    /// `(1−B)ᵈ·(1−Bˢ)ᴰ`
    fn difference_polynomial(&self) -> Vec<f64> {
        let mut poly = vec![1.0];
        for _ in 0..self.params.d {
            poly = multiply(&poly, &[1.0, -1.0]);
        }
        let mut seasonal = vec![0.0; self.params.period + 1];
        seasonal[0] = 1.0;
        seasonal[self.params.period] = -1.0;
        for _ in 0..self.params.seasonal_d {
            poly = multiply(&poly, &seasonal);
        }
        poly
    }

    /// Expanded AR and MA lag polynomials for coefficients ordered
    /// `[ar, ma, seasonal_ar, seasonal_ma]`
    fn arma_polynomials(&self, coefficients: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (ar, rest) = coefficients.split_at(self.params.p);
        let (ma, rest) = rest.split_at(self.params.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(self.params.seasonal_p);

        let ar_poly = multiply(
            &lag_polynomial(ar, 1, -1.0),
            &lag_polynomial(seasonal_ar, self.params.period, -1.0),
        );
        let ma_poly = multiply(
            &lag_polynomial(ma, 1, 1.0),
            &lag_polynomial(seasonal_ma, self.params.period, 1.0),
        );
        (ar_poly, ma_poly)
    }
}

impl ForecasterProperties for SeasonalArima {
    fn kind(&self) -> ModelKind {
        ModelKind::SeasonalArima
    }

    fn minimum_samples(&self) -> usize {
        self.params.differencing_loss() + self.params.n_coefficients() + 1
    }
}

impl Forecaster for SeasonalArima {
    #[instrument(skip(self, series), fields(series_id = series.id()))]
    fn forecast(&self, series: &Series, horizon: usize) -> Result<ForecastResult> {
        let last = series
            .last_timestamp()
            .ok_or(Error::InsufficientData { expected: 1, actual: 0 })?;
        let values = series.values();

        let fit = self.fit(&values)?;
        let predictions = self.predict(&fit, &values, horizon)?;
        let z = two_sided_z(INTERVAL_COVERAGE);

        let points = month_ends_after(last, horizon)
            .into_iter()
            .zip(predictions)
            .map(|(timestamp, (estimate, se))| ForecastPoint {
                timestamp,
                estimate,
                lower: estimate - z * se,
                upper: estimate + z * se,
            })
            .collect();
        ForecastResult::new(ModelKind::SeasonalArima, points)
    }
}

/// `1 + sign·Σ c_i·B^{i·step}`
fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

/// Product of two lag polynomials
fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Apply a lag polynomial, dropping the first `degree` points
fn apply_polynomial(poly: &[f64], values: &[f64]) -> Vec<f64> {
    let degree = poly.len() - 1;
    (degree..values.len())
        .map(|t| poly.iter().enumerate().map(|(i, c)| c * values[t - i]).sum())
        .collect()
}

/// Innovations of an ARMA model with zero pre-sample values
fn css_residuals(ar_poly: &[f64], ma_poly: &[f64], w: &[f64]) -> Vec<f64> {
    let mut e = Vec::with_capacity(w.len());
    for t in 0..w.len() {
        let mut value = 0.0;
        for (i, a) in ar_poly.iter().enumerate().take(t + 1) {
            value += a * w[t - i];
        }
        for (j, b) in ma_poly.iter().enumerate().skip(1).take(t) {
            value -= b * e[t - j];
        }
        e.push(value);
    }
    e
}

/// MA(∞) weights of `ma(B) / ar(B)`
fn psi_weights(ar_poly: &[f64], ma_poly: &[f64], count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        let mut value = ma_poly.get(j).copied().unwrap_or(0.0);
        for i in 1..=j.min(ar_poly.len() - 1) {
            value -= ar_poly[i] * psi[j - i];
        }
        psi.push(value);
    }
    psi
}
