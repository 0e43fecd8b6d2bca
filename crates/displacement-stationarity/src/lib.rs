//! Stationarity testing for displacement series
//!
//! Provides the augmented Dickey-Fuller unit-root test with automatic lag
//! selection and MacKinnon p-values. The result decides which forecasting
//! model a series is routed to.
//!
//! # Example
//!
//! ```ignore
//! use displacement_stationarity::{AdfTest, StationarityTest};
//!
//! let result = AdfTest::default().analyze(&values)?;
//! if result.is_stationary() {
//!     // seasonal ARIMA branch
//! }
//! ```

pub mod adf;
pub mod mackinnon;
pub mod traits;
pub mod types;

pub use adf::AdfTest;
pub use traits::{StationarityTest, StationarityTestProperties};
pub use types::{
    ConfidenceLevel, CriticalValues, Metric, MetricValue, Stationarity, StationarityResult,
};
