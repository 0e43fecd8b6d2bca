//! Report and chart rendering for displacement series
//!
//! - [`ReportRenderer`]: fixed-layout SVG table with the stationarity test
//!   and forecast summary
//! - [`ChartRenderer`]: decomposition and forecast charts, drawn with
//!   `plotters` or skipped entirely

pub mod chart;
pub mod describe;
pub mod format;
pub mod report;
pub mod svg;

pub use chart::{ChartRenderer, NullChartRenderer, SvgChartRenderer};
pub use describe::SeriesDescription;
pub use format::NumberFormat;
pub use report::{translate_metric, Report, ReportRenderer, NOT_AVAILABLE};
pub use svg::{Element, SvgDocument, Text, TextAnchor};
