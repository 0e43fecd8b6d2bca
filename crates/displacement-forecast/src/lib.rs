//! Forecasting for displacement series
//!
//! Two models are available:
//!
//! - [`SeasonalArima`]: seasonal ARIMA (1,1,1)(1,1,1)₁₂ fitted by conditional
//!   sum of squares, used when a series is stationary
//! - [`BayesianAdditive`]: piecewise-linear trend with changepoints plus
//!   yearly seasonality, used when it is not
//!
//! [`ModelSelector`] routes a tested series to one of them through the
//! [`UntestedSeries`] → [`TestedSeries`] → [`ForecastedSeries`] transitions.

pub mod bayesian;
pub mod model;
pub mod optimize;
pub mod sarima;
pub mod selector;
pub mod traits;
pub mod types;

pub use bayesian::{BayesianAdditive, BayesianFit, BayesianParams};
pub use model::ForecastModel;
pub use optimize::{NelderMead, OptimizationResult};
pub use sarima::{SarimaFit, SarimaParams, SeasonalArima};
pub use selector::{ForecastedSeries, ModelSelector, TestedSeries, UntestedSeries};
pub use traits::{Forecaster, ForecasterProperties};
pub use types::{ForecastPoint, ForecastResult, ModelKind};
