//! MacKinnon response surfaces for the Dickey-Fuller distribution
//!
//! Coefficients cover the regression with a constant and a single
//! integrated variable.

use crate::types::CriticalValues;
use displacement_core::numeric::normal_cdf;

/// Above this statistic the p-value is 1
const TAU_MAX: f64 = 2.74;
/// Below this statistic the p-value is 0
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR: f64 = -1.61;

/// Small-p polynomial, lowest degree first (MacKinnon 1994)
const TAU_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
/// Large-p polynomial, lowest degree first (MacKinnon 1994)
const TAU_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Finite-sample critical value surfaces, `b0 + b1/n + b2/n² + b3/n³`
/// (MacKinnon 2010)
const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Approximate p-value of a Dickey-Fuller statistic
pub fn p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let poly = if statistic <= TAU_STAR {
        polyval(&TAU_SMALLP, statistic)
    } else {
        polyval(&TAU_LARGEP, statistic)
    };
    normal_cdf(poly)
}

/// Critical values for a regression with `nobs` observations
pub fn critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_percent: polyval(&CRIT_1, inv),
        five_percent: polyval(&CRIT_5, inv),
        ten_percent: polyval(&CRIT_10, inv),
    }
}

/// Horner evaluation with coefficients lowest degree first
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
