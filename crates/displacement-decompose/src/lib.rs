//! Additive seasonal decomposition
//!
//! Splits a series into trend, seasonal and residual components using a
//! centered moving average. The output only feeds the decomposition chart.

pub mod seasonal;

pub use seasonal::{Decomposition, SeasonalDecomposer};
