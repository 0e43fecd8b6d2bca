//! Fixed analysis constants
//!
//! These values are part of the analysis contract and are not
//! exposed through runtime configuration.

/// Minimum observations for a series to be analysed (two seasonal cycles of
/// the decomposition period plus headroom for the forecasters)
///
/// The seasonal ARIMA model needs 18 points once both differences are
/// taken, so stationary series of 15 to 17 observations are analysed but
/// fail at the forecast step with a model-fit error.
pub const MIN_OBSERVATIONS: usize = 15;

/// Number of future points produced by every forecaster
pub const FORECAST_HORIZON: usize = 6;

/// Seasonal period of the additive decomposition
pub const DECOMPOSITION_PERIOD: usize = 6;

/// Seasonal period of the seasonal ARIMA model
///
/// Independent of [`DECOMPOSITION_PERIOD`].
pub const SARIMA_SEASONAL_PERIOD: usize = 12;

/// A series is stationary when the unit-root p-value is strictly below this
pub const STATIONARITY_SIGNIFICANCE: f64 = 0.05;

/// Coverage of every forecast interval
pub const INTERVAL_COVERAGE: f64 = 0.95;

/// Changepoint flexibility of the Bayesian additive model
pub const CHANGEPOINT_PRIOR_SCALE: f64 = 0.05;

/// Column-name suffix marking verification-only columns
pub const VERIFICATION_SUFFIX: &str = "_VER";
