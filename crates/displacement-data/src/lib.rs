//! Loading of displacement monitoring files
//!
//! Reads one delimited file per monitored structure and splits it into one
//! [`Series`](displacement_core::Series) per measurement column, skipping
//! verification-only columns.

pub mod dates;
pub mod loader;

pub use dates::{parse_day_first, parse_day_first_datetime};
pub use loader::{Dataset, LoaderOptions, SeriesLoader};
