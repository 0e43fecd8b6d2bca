//! Numeric kernels shared by the stationarity test and the forecasters
//!
//! Ordinary least squares with coefficient standard errors and information
//! criteria, plus standard-normal helpers.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, DVector};
use statrs::function::erf;

/// Result of an ordinary least squares regression
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations (design rows)
    pub nobs: usize,
}

impl OlsFit {
    /// Number of estimated parameters
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// t-statistic of every coefficient
    pub fn t_values(&self) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.std_errors)
            .map(|(b, se)| b / se)
            .collect()
    }

    /// Gaussian log-likelihood evaluated at the ML variance estimate
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params() as f64
    }
}

/// Fit `response ~ design` by ordinary least squares
///
/// Solves the normal equations with a Cholesky factorisation and falls back
/// to an SVD pseudo-inverse for rank-deficient designs.
pub fn ols(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<OlsFit> {
    let (nobs, k) = design.shape();
    if nobs != response.len() {
        return Err(Error::InvalidParameter(format!(
            "design has {nobs} rows but response has {} values",
            response.len()
        )));
    }
    if nobs <= k {
        return Err(Error::InsufficientData {
            expected: k + 1,
            actual: nobs,
        });
    }

    let xt = design.transpose();
    let xtx = &xt * design;
    let xty = &xt * response;

    let xtx_inv = symmetric_inverse(xtx)?;

    let beta = &xtx_inv * xty;
    let residuals = response - design * &beta;
    let ssr = residuals.norm_squared();
    let sigma2 = ssr / (nobs - k) as f64;

    let std_errors = (0..k).map(|i| (sigma2 * xtx_inv[(i, i)]).sqrt()).collect();

    Ok(OlsFit {
        coefficients: beta.as_slice().to_vec(),
        std_errors,
        ssr,
        nobs,
    })
}

/// Inverse of a symmetric positive semi-definite matrix
///
/// Uses a Cholesky factorisation and falls back to an SVD pseudo-inverse
/// when the matrix is not numerically positive definite.
pub fn symmetric_inverse(matrix: DMatrix<f64>) -> Result<DMatrix<f64>> {
    match matrix.clone().cholesky() {
        Some(chol) => Ok(chol.inverse()),
        None => matrix
            .svd(true, true)
            .pseudo_inverse(1e-12)
            .map_err(|e| Error::Computation(format!("Failed to invert normal equations: {e}"))),
    }
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / std::f64::consts::SQRT_2))
}

/// Inverse of the standard normal CDF for `p` in (0, 1)
pub fn normal_quantile(p: f64) -> f64 {
    std::f64::consts::SQRT_2 * erf::erf_inv(2.0 * p - 1.0)
}

/// Two-sided critical value for a central interval of the given coverage
///
/// `0.95` yields roughly 1.96.
pub fn two_sided_z(coverage: f64) -> f64 {
    normal_quantile(0.5 + coverage / 2.0)
}
