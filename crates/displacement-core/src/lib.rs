//! Core types for displacement series analysis
//!
//! This crate holds what every stage of the batch pipeline shares: the
//! immutable [`Series`] model, the unified [`Error`] type, the fixed analysis
//! constants and a few numeric kernels (least squares, normal quantiles,
//! month-end calendars).

pub mod calendar;
pub mod constants;
pub mod error;
pub mod numeric;
pub mod series;

// Re-export core types
pub use error::{Error, Result};
pub use numeric::{ols, symmetric_inverse, OlsFit};
pub use series::{Observation, Series};
